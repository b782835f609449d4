//! Property-based tests for invariants that hold for every input:
//! - cyclomatic complexity is at least 1
//! - loop depth grows by one per level of lexical containment
//! - the estimator label follows loop nesting
//! - direct self-calls mark recursion and add a self-edge
//! - dead-code verdicts depend only on reachability
//! - re-running an analysis gives an identical report

mod common;

use codegauge::{analyze, AnalysisConfig, ComplexityLabel, SourceInput};
use common::analyze_default;
use proptest::prelude::*;

const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "case", "class", "continue", "def", "del",
    "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is",
    "lambda", "match", "nonlocal", "not", "or", "pass", "raise", "return", "try", "type",
    "while", "with", "yield",
];

fn python_identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,12}".prop_filter("not a keyword", |s| !PYTHON_KEYWORDS.contains(&s.as_str()))
}

/// A Python function with `depth` nested `for` loops and `branches`
/// `if` statements in the innermost body.
fn nested_loop_function(depth: usize, branches: usize) -> String {
    let mut source = String::from("def work(items):\n");
    for level in 0..depth {
        let indent = "    ".repeat(level + 1);
        source.push_str(&format!("{indent}for v{level} in items:\n"));
    }
    let indent = "    ".repeat(depth + 1);
    for branch in 0..branches {
        source.push_str(&format!("{indent}if items == {branch}:\n{indent}    print(items)\n"));
    }
    source.push_str(&format!("{indent}print(items)\n"));
    source
}

/// A C program whose `main` calls a chain of `chain` functions, plus
/// `orphans` functions that nothing calls.
fn c_program(chain: usize, orphans: usize) -> String {
    let mut source = String::new();
    for i in 0..chain {
        let body = if i + 1 < chain {
            format!("step{}();", i + 1)
        } else {
            "return;".to_string()
        };
        source.push_str(&format!("void step{i}(void) {{ {body} }}\n"));
    }
    for i in 0..orphans {
        source.push_str(&format!("void orphan{i}(void) {{ orphan{i}(); }}\n"));
    }
    let first = if chain > 0 { "step0();" } else { "" };
    source.push_str(&format!("int main(void) {{ {first} return 0; }}\n"));
    source
}

proptest! {
    #[test]
    fn prop_loop_nesting_drives_label_and_complexity(depth in 0usize..5, branches in 0usize..4) {
        let source = nested_loop_function(depth, branches);
        let report = analyze_default(&[("work.py", source.as_str())]);
        let record = &report.records[0];

        prop_assert!(record.cyclomatic >= 1);
        prop_assert_eq!(record.cyclomatic as usize, 1 + depth + branches);
        prop_assert_eq!(record.max_loop_depth as usize, depth);
        prop_assert_eq!(record.nested_loop_count, depth.saturating_sub(1));

        let expected = match depth {
            0 => ComplexityLabel::Constant,
            1 => ComplexityLabel::Linear,
            d => ComplexityLabel::Polynomial(d as u32),
        };
        prop_assert_eq!(record.complexity_label, expected);
    }

    #[test]
    fn prop_loop_depths_follow_containment(depth in 1usize..6) {
        let source = nested_loop_function(depth, 0);
        let input = SourceInput::from_path("work.py", source);
        let unit = codegauge::analyzers::analyze_source(&input).unwrap();
        let depths: Vec<u32> = unit.functions[0].loops.iter().map(|l| l.depth).collect();
        let expected: Vec<u32> = (1..=depth as u32).collect();
        prop_assert_eq!(depths, expected);
    }

    #[test]
    fn prop_self_call_is_recursive(name in python_identifier()) {
        let source = format!("def {name}(n):\n    return {name}(n - 1)\n");
        let report = analyze_default(&[("rec.py", source.as_str())]);
        let record = &report.records[0];

        prop_assert!(record.is_recursive);
        prop_assert!(report.call_graph.has_edge(&record.id, &record.id));
        prop_assert_eq!(record.complexity_label, ComplexityLabel::Exponential);
    }

    #[test]
    fn prop_only_unreachable_functions_are_unused(chain in 0usize..6, orphans in 0usize..4) {
        let source = c_program(chain, orphans);
        let report = analyze_default(&[("prog.c", source.as_str())]);

        let expected: Vec<String> = (0..orphans).map(|i| format!("orphan{i}")).collect();
        prop_assert_eq!(report.unused_function_names(), expected);
    }

    #[test]
    fn prop_analysis_is_deterministic(
        chain in 0usize..4,
        orphans in 0usize..3,
        depth in 0usize..3,
    ) {
        let inputs = vec![
            SourceInput::from_path("prog.c", c_program(chain, orphans)),
            SourceInput::from_path("work.py", nested_loop_function(depth, 1)),
        ];
        let config = AnalysisConfig::default();
        let first = analyze(&inputs, &config).unwrap();
        let second = analyze(&inputs, &config).unwrap();
        prop_assert_eq!(&first, &second);

        let sequential = analyze(&inputs, &AnalysisConfig { parallel: false, ..config }).unwrap();
        prop_assert_eq!(first, sequential);
    }
}
