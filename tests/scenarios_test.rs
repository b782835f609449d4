//! End-to-end scenarios over the public `analyze` entry point.

mod common;

use codegauge::{AnalysisConfig, AnalysisWarning, ComplexityLabel, Suggestion};
use common::{analyze_default, analyze_sources, record, SAMPLE_C};
use indoc::indoc;
use pretty_assertions::assert_eq;

#[test]
fn test_scenario_a_unused_function_in_c() {
    let report = analyze_default(&[("sample.c", SAMPLE_C)]);

    assert_eq!(report.unused_function_names(), vec!["unusedFunction"]);
    for name in ["main", "sumArray", "printPairs"] {
        assert!(!record(&report, name).unused, "{name} should be reachable");
    }
    assert!(record(&report, "unusedFunction").unused);
}

#[test]
fn test_scenario_a_unused_function_in_python() {
    let source = indoc! {r#"
        def sumArray(arr):
            total = 0
            for x in arr:
                total += x
            return total

        def printPairs(arr):
            for a in arr:
                for b in arr:
                    print(a, b)

        def unusedFunction():
            print("never called")

        def main():
            numbers = [1, 2, 3]
            print(sumArray(numbers))
            printPairs(numbers)

        if __name__ == "__main__":
            main()
    "#};
    let report = analyze_default(&[("sample.py", source)]);
    assert_eq!(report.unused_function_names(), vec!["unusedFunction"]);
}

#[test]
fn test_scenario_b_nested_loops_are_quadratic() {
    let python = indoc! {"
        def printMatrix(matrix):
            for row in matrix:
                for value in row:
                    print(value)
    "};
    let javascript = indoc! {"
        function printMatrix(matrix) {
          for (let i = 0; i < matrix.length; i++) {
            for (let j = 0; j < matrix[i].length; j++) {
              console.log(matrix[i][j]);
            }
          }
        }
    "};
    let java = indoc! {"
        public class Matrix {
            public static void printMatrix(int[][] m) {
                for (int i = 0; i < m.length; i++) {
                    for (int j = 0; j < m[i].length; j++) {
                        System.out.print(m[i][j]);
                    }
                }
            }
        }
    "};
    let report = analyze_default(&[
        ("matrix.py", python),
        ("matrix.js", javascript),
        ("Matrix.java", java),
    ]);

    assert_eq!(report.records.len(), 3);
    for record in &report.records {
        assert_eq!(record.complexity_label, ComplexityLabel::Polynomial(2), "{}", record.id);
        assert_eq!(record.complexity_label.to_string(), "O(n^2)");
        assert_eq!(record.max_loop_depth, 2);
        assert!(!record.is_recursive);
    }
}

#[test]
fn test_scenario_c_recursion_is_exponential() {
    let python = indoc! {"
        def factorial(n):
            if n <= 1:
                return 1
            return n * factorial(n - 1)
    "};
    let c = indoc! {"
        long factorial(int n) {
            if (n <= 1) return 1;
            return n * factorial(n - 1);
        }
    "};
    let report = analyze_default(&[("fact.py", python), ("fact.c", c)]);

    assert_eq!(report.records.len(), 2);
    for record in &report.records {
        assert!(record.is_recursive);
        assert_eq!(record.complexity_label.to_string(), "O(2^n)");
        assert!(report.call_graph.has_edge(&record.id, &record.id));
    }
}

#[test]
fn test_scenario_d_cross_unit_ambiguity_warns() {
    let helper = "def helper():\n    return 1\n";
    let caller = "def main():\n    return helper()\n";
    let config = AnalysisConfig {
        cross_unit_resolution: true,
        ..Default::default()
    };
    let report = analyze_sources(
        &[("a.py", helper), ("b.py", helper), ("c.py", caller)],
        &config,
    );

    let ambiguous: Vec<&AnalysisWarning> = report.ambiguous_warnings().collect();
    assert_eq!(ambiguous.len(), 1);
    match ambiguous[0] {
        AnalysisWarning::AmbiguousResolution {
            callee, candidates, ..
        } => {
            assert_eq!(callee, "helper");
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("unexpected warning {other:?}"),
    }

    let main = &record(&report, "main").id;
    assert!(report.call_graph.get_callees(main).is_empty());
    assert!(report.unused_functions.is_empty());
}

#[test]
fn test_scenario_d_without_cross_unit_resolution() {
    let helper = "def helper():\n    return 1\n";
    let caller = "def main():\n    return helper()\n";
    let report = analyze_default(&[("a.py", helper), ("b.py", helper), ("c.py", caller)]);

    assert_eq!(report.ambiguous_warnings().count(), 0);
    assert_eq!(report.call_graph.edge_count(), 0);
}

#[test]
fn test_scenario_e_malformed_unit_is_isolated() {
    let good_py = "def main():\n    return 0\n";
    let good_js = "function main() { return 0; }\n";
    let broken = "def broken(:\n    pass\n";
    let report = analyze_default(&[("a.py", good_py), ("b.js", good_js), ("c.py", broken)]);

    assert_eq!(report.summaries.len(), 2);
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.failed_units.len(), 1);
    assert_eq!(report.failed_units[0].path, std::path::PathBuf::from("c.py"));
}

#[test]
fn test_unused_variables_end_to_end() {
    let source = indoc! {"
        LIMIT = 10
        unused_global = 3

        def main():
            total = 0
            scratch = 5
            for i in range(LIMIT):
                total += i
            print(total)

        main()
    "};
    let report = analyze_default(&[("vars.py", source)]);
    let found: Vec<(Option<&str>, &str)> = report
        .unused_variables
        .iter()
        .map(|v| (v.function.as_deref(), v.name.as_str()))
        .collect();
    assert_eq!(found, vec![(Some("main"), "scratch"), (None, "unused_global")]);
}

#[test]
fn test_unit_summary_for_c_sample() {
    let report = analyze_default(&[("sample.c", SAMPLE_C)]);
    let summary = &report.summaries[0];

    assert_eq!(summary.function_count, 4);
    assert_eq!(summary.nested_loop_count, 1);
    assert_eq!(summary.comment_lines, 3);
    assert_eq!(summary.largest_function.as_deref(), Some("sumArray"));
    assert_eq!(summary.maintainability_index, None);
    assert!(summary
        .suggestions
        .contains(&Suggestion::NestedLoops { count: 1 }));
    assert!(summary.suggestions.contains(&Suggestion::UnusedFunctions {
        names: vec!["unusedFunction".to_string()]
    }));
}

#[test]
fn test_python_units_carry_maintainability() {
    let source = indoc! {"
        # adds two numbers
        def add(a, b):
            return a + b
    "};
    let report = analyze_default(&[("add.py", source)]);
    let mi = record(&report, "add").maintainability_index.unwrap();
    assert!((0.0..=100.0).contains(&mi));
    assert!(report.summaries[0].maintainability_index.is_some());

    let js = analyze_default(&[("add.js", "function add(a, b) { return a + b; }\n")]);
    assert_eq!(record(&js, "add").maintainability_index, None);
}

#[test]
fn test_low_maintainability_is_flagged_and_suggested() {
    let source = indoc! {"
        # adds two numbers
        def add(a, b):
            return a + b
    "};
    let config = AnalysisConfig {
        low_maintainability_threshold: 100.0,
        ..Default::default()
    };
    let report = analyze_sources(&[("add.py", source)], &config);

    let add = record(&report, "add");
    assert!(add.maintainability_index.unwrap() < 100.0);
    assert!(add.low_maintainability);
    assert!(report.summaries[0]
        .suggestions
        .iter()
        .any(|s| matches!(s, Suggestion::LowMaintainability { .. })));
}

#[test]
fn test_deeply_nested_expression_fails_only_its_unit() {
    let terms = vec!["1"; 10_000].join(" + ");
    let deep_py = format!("def f():\n    return {terms}\n");
    let deep_js = format!("function g() {{ return {terms}; }}\n");
    let good = "def main():\n    return 0\n";
    let report = analyze_default(&[
        ("deep.py", deep_py.as_str()),
        ("deep.js", deep_js.as_str()),
        ("good.py", good),
    ]);

    let failed: Vec<&std::path::Path> =
        report.failed_units.iter().map(|e| e.path.as_path()).collect();
    assert_eq!(
        failed,
        vec![std::path::Path::new("deep.py"), std::path::Path::new("deep.js")]
    );
    assert_eq!(report.summaries.len(), 1);
    assert!(!record(&report, "main").unused);
}

#[test]
fn test_java_static_initializer_keeps_callee_alive() {
    let source = indoc! {"
        public class Registry {
            static int ready;
            static {
                init();
            }
            static void init() {
                ready = 1;
            }
            static void orphan() {
                ready = 0;
            }
        }
    "};
    let report = analyze_default(&[("Registry.java", source)]);

    assert_eq!(report.unused_function_names(), vec!["Registry.orphan"]);
    assert!(!record(&report, "Registry.init").unused);
}
