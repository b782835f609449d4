//! Per-unit overview with refactoring suggestions.

use super::{MetricsRecord, UnusedVariable};
use crate::complexity::{average_complexity, max_complexity, EfficiencyGrade};
use crate::core::{Language, SourceUnit};
use crate::metrics::{LocCount, MetricThresholds};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Comment ratio below which a unit is considered under-documented.
const LOW_COMMENT_RATIO: f64 = 0.05;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Suggestion {
    NestedLoops { count: usize },
    LowCommentRatio { ratio: f64 },
    LowMaintainability { index: f64 },
    UnusedVariables { names: Vec<String> },
    UnusedFunctions { names: Vec<String> },
    LongFunction { name: String, length: usize },
    HighComplexity { name: String, cyclomatic: u32 },
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suggestion::NestedLoops { count } => write!(
                f,
                "{count} nested loop(s) found; consider flattening them or using a better-suited data structure"
            ),
            Suggestion::LowCommentRatio { ratio } => write!(
                f,
                "only {:.1}% of lines are comments; document the non-obvious parts",
                ratio * 100.0
            ),
            Suggestion::LowMaintainability { index } => write!(
                f,
                "maintainability index is {index:.1}; simplify control flow and split large functions"
            ),
            Suggestion::UnusedVariables { names } => {
                write!(f, "remove unused variables: {}", names.join(", "))
            }
            Suggestion::UnusedFunctions { names } => {
                write!(f, "remove or use unreachable functions: {}", names.join(", "))
            }
            Suggestion::LongFunction { name, length } => {
                write!(f, "`{name}` is {length} lines long; split it into smaller functions")
            }
            Suggestion::HighComplexity { name, cyclomatic } => write!(
                f,
                "`{name}` has cyclomatic complexity {cyclomatic}; reduce branching"
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnitSummary {
    pub path: PathBuf,
    pub language: Language,
    pub total_lines: usize,
    pub comment_lines: usize,
    pub comment_ratio: f64,
    pub function_count: usize,
    pub loop_count: usize,
    pub nested_loop_count: usize,
    pub average_complexity: f64,
    pub max_complexity: u32,
    pub largest_function: Option<String>,
    pub efficiency_grade: EfficiencyGrade,
    pub maintainability_index: Option<f64>,
    pub suggestions: Vec<Suggestion>,
}

impl UnitSummary {
    /// Summarize `unit` from its finished records (unused flags already set).
    pub fn build(
        unit: &SourceUnit,
        records: &[&MetricsRecord],
        maintainability_index: Option<f64>,
        unused_variables: &[&UnusedVariable],
        thresholds: &MetricThresholds,
    ) -> Self {
        let loc = LocCount::from_kinds(&unit.line_kinds);
        let comment_ratio = if loc.physical_lines == 0 {
            0.0
        } else {
            loc.comment_lines as f64 / loc.physical_lines as f64
        };

        let complexities: Vec<u32> = records.iter().map(|r| r.cyclomatic).collect();
        let average = average_complexity(&complexities);

        // first declared wins ties
        let largest_function = records
            .iter()
            .fold(None::<&&MetricsRecord>, |best, r| match best {
                Some(b) if b.length >= r.length => Some(b),
                _ => Some(r),
            })
            .map(|r| r.id.name.clone());

        let mut summary = Self {
            path: unit.path.clone(),
            language: unit.language,
            total_lines: loc.physical_lines,
            comment_lines: loc.comment_lines,
            comment_ratio,
            function_count: records.len(),
            loop_count: records.iter().map(|r| r.loop_count).sum(),
            nested_loop_count: records.iter().map(|r| r.nested_loop_count).sum(),
            average_complexity: average,
            max_complexity: max_complexity(&complexities),
            largest_function,
            efficiency_grade: EfficiencyGrade::from_average(average),
            maintainability_index,
            suggestions: Vec::new(),
        };
        summary.suggestions = suggestions(&summary, records, unused_variables, thresholds);
        summary
    }
}

fn suggestions(
    summary: &UnitSummary,
    records: &[&MetricsRecord],
    unused_variables: &[&UnusedVariable],
    thresholds: &MetricThresholds,
) -> Vec<Suggestion> {
    let mut out = Vec::new();

    if summary.nested_loop_count > 0 {
        out.push(Suggestion::NestedLoops {
            count: summary.nested_loop_count,
        });
    }
    if summary.comment_ratio < LOW_COMMENT_RATIO {
        out.push(Suggestion::LowCommentRatio {
            ratio: summary.comment_ratio,
        });
    }
    if let Some(index) = summary
        .maintainability_index
        .filter(|mi| *mi < thresholds.low_maintainability)
    {
        out.push(Suggestion::LowMaintainability { index });
    }
    if !unused_variables.is_empty() {
        out.push(Suggestion::UnusedVariables {
            names: unused_variables.iter().map(|v| v.name.clone()).collect(),
        });
    }

    let unused: Vec<String> = records
        .iter()
        .filter(|r| r.unused)
        .map(|r| r.id.name.clone())
        .collect();
    if !unused.is_empty() {
        out.push(Suggestion::UnusedFunctions { names: unused });
    }

    for record in records {
        if record.length > thresholds.long_function_lines {
            out.push(Suggestion::LongFunction {
                name: record.id.name.clone(),
                length: record.length,
            });
        }
        if record.cyclomatic > thresholds.complexity_critical {
            out.push(Suggestion::HighComplexity {
                name: record.id.name.clone(),
                cyclomatic: record.cyclomatic,
            });
        }
    }

    out
}
