//! The `AnalysisReport`: the single artifact an analysis run hands to
//! presentation and report-writing code.

pub mod summary;

pub use summary::{Suggestion, UnitSummary};

use crate::call_graph::{CallGraph, FunctionId};
use crate::complexity::ComplexityLabel;
use crate::core::{Language, ParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriticalReason {
    HighComplexity,
    LongFunction,
}

impl fmt::Display for CriticalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriticalReason::HighComplexity => write!(f, "high complexity"),
            CriticalReason::LongFunction => write!(f, "long function"),
        }
    }
}

/// Metrics for one declared function.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricsRecord {
    pub id: FunctionId,
    pub language: Language,
    /// Lines in the declaration's span.
    pub length: usize,
    pub parameter_count: usize,
    pub statement_count: usize,
    pub cyclomatic: u32,
    pub loop_count: usize,
    pub max_loop_depth: u32,
    pub nested_loop_count: usize,
    /// Comment lines in the span over span length, in `[0, 1]`.
    pub comment_ratio: f64,
    pub maintainability_index: Option<f64>,
    pub low_maintainability: bool,
    pub is_recursive: bool,
    pub critical: bool,
    pub critical_reasons: Vec<CriticalReason>,
    /// Set by dead-code detection.
    pub unused: bool,
    pub complexity_label: ComplexityLabel,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct UnusedVariable {
    pub unit: PathBuf,
    /// `None` for module-level variables.
    pub function: Option<String>,
    pub name: String,
    pub line: usize,
}

/// Non-fatal findings recorded during a run.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    /// A call name matched more than one declaration.
    AmbiguousResolution {
        unit: PathBuf,
        caller: Option<FunctionId>,
        callee: String,
        line: usize,
        candidates: Vec<FunctionId>,
    },
    /// Two declarations in one unit share a qualified name.
    DuplicateDeclaration {
        unit: PathBuf,
        name: String,
        lines: Vec<usize>,
    },
    MetricDegraded {
        function: FunctionId,
        metric: String,
        reason: String,
    },
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisWarning::AmbiguousResolution {
                unit,
                caller,
                callee,
                line,
                candidates,
            } => {
                let from = caller
                    .as_ref()
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "<module>".to_string());
                write!(
                    f,
                    "{}:{line}: call to `{callee}` from {from} is ambiguous ({} candidates)",
                    unit.display(),
                    candidates.len()
                )
            }
            AnalysisWarning::DuplicateDeclaration { unit, name, lines } => {
                let lines: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
                write!(
                    f,
                    "{}: `{name}` is declared more than once (lines {})",
                    unit.display(),
                    lines.join(", ")
                )
            }
            AnalysisWarning::MetricDegraded {
                function,
                metric,
                reason,
            } => write!(f, "{function}: {metric} not computed: {reason}"),
        }
    }
}

/// Everything one run produces. Records are in input order, then
/// declaration order within a unit.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub records: Vec<MetricsRecord>,
    pub call_graph: CallGraph,
    pub unused_functions: Vec<FunctionId>,
    pub unused_variables: Vec<UnusedVariable>,
    pub summaries: Vec<UnitSummary>,
    pub failed_units: Vec<ParseError>,
    pub warnings: Vec<AnalysisWarning>,
}

impl AnalysisReport {
    pub fn record(&self, name: &str) -> Option<&MetricsRecord> {
        self.records.iter().find(|r| r.id.name == name)
    }

    pub fn records_in<'a>(&'a self, unit: &'a Path) -> impl Iterator<Item = &'a MetricsRecord> {
        self.records.iter().filter(move |r| r.id.file == unit)
    }

    pub fn critical_records(&self) -> impl Iterator<Item = &MetricsRecord> {
        self.records.iter().filter(|r| r.critical)
    }

    pub fn unused_function_names(&self) -> Vec<&str> {
        self.unused_functions.iter().map(|id| id.name.as_str()).collect()
    }

    pub fn ambiguous_warnings(&self) -> impl Iterator<Item = &AnalysisWarning> {
        self.warnings
            .iter()
            .filter(|w| matches!(w, AnalysisWarning::AmbiguousResolution { .. }))
    }

    pub fn analyzed_unit_count(&self) -> usize {
        self.summaries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let warning = AnalysisWarning::AmbiguousResolution {
            unit: PathBuf::from("b.py"),
            caller: None,
            callee: "helper".into(),
            line: 4,
            candidates: vec![
                FunctionId::new("a.py", "helper", 1),
                FunctionId::new("c.py", "helper", 1),
            ],
        };
        assert_eq!(
            warning.to_string(),
            "b.py:4: call to `helper` from <module> is ambiguous (2 candidates)"
        );

        let duplicate = AnalysisWarning::DuplicateDeclaration {
            unit: PathBuf::from("a.c"),
            name: "init".into(),
            lines: vec![2, 9],
        };
        assert_eq!(
            duplicate.to_string(),
            "a.c: `init` is declared more than once (lines 2, 9)"
        );
    }

    #[test]
    fn test_warning_serializes_with_kind_tag() {
        let warning = AnalysisWarning::MetricDegraded {
            function: FunctionId::new("a.py", "f", 3),
            metric: "maintainability_index".into(),
            reason: "non-finite result".into(),
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "metric_degraded");
        assert_eq!(json["metric"], "maintainability_index");
    }

    #[test]
    fn test_critical_reason_is_snake_case() {
        let json = serde_json::to_string(&CriticalReason::HighComplexity).unwrap();
        assert_eq!(json, "\"high_complexity\"");
    }

    fn record(file: &str, name: &str, critical: bool) -> MetricsRecord {
        MetricsRecord {
            id: FunctionId::new(file, name, 1),
            language: Language::Python,
            length: 3,
            parameter_count: 0,
            statement_count: 1,
            cyclomatic: 1,
            loop_count: 0,
            max_loop_depth: 0,
            nested_loop_count: 0,
            comment_ratio: 0.0,
            maintainability_index: None,
            low_maintainability: false,
            is_recursive: false,
            critical,
            critical_reasons: Vec::new(),
            unused: false,
            complexity_label: ComplexityLabel::Constant,
        }
    }

    #[test]
    fn test_record_queries() {
        let report = AnalysisReport {
            records: vec![
                record("a.py", "load", false),
                record("b.py", "parse", true),
                record("a.py", "save", true),
            ],
            ..Default::default()
        };

        let in_a: Vec<&str> = report
            .records_in(Path::new("a.py"))
            .map(|r| r.id.name.as_str())
            .collect();
        assert_eq!(in_a, vec!["load", "save"]);

        let critical: Vec<&str> = report
            .critical_records()
            .map(|r| r.id.name.as_str())
            .collect();
        assert_eq!(critical, vec!["parse", "save"]);
    }
}
