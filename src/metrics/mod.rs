//! Metrics engine: per-function records and unit-level maintainability.
//!
//! The engine never branches on a language tag. Each metric checks the
//! unit's [`Capabilities`](crate::core::Capabilities) and falls back to a
//! default (zero, or absent) when the facet it needs is not provided.

pub mod loc_counter;
pub mod maintainability;

pub use loc_counter::{classify_lines, LocCount};
pub use maintainability::{maintainability_index, MaintainabilityInputs};

use crate::call_graph::FunctionId;
use crate::complexity::cyclomatic::combine_cyclomatic;
use crate::complexity::{calculate_cyclomatic, ComplexityLabel};
use crate::config::AnalysisConfig;
use crate::core::{FunctionDecl, SourceUnit};
use crate::report::{AnalysisWarning, CriticalReason, MetricsRecord};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricThresholds {
    pub complexity_critical: u32,
    pub function_length_critical: usize,
    pub long_function_lines: usize,
    pub low_maintainability: f64,
}

impl Default for MetricThresholds {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for MetricThresholds {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            complexity_critical: config.complexity_critical_threshold,
            function_length_critical: config.function_length_critical_threshold,
            long_function_lines: config.long_function_lines,
            low_maintainability: config.low_maintainability_threshold,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitMetrics {
    pub records: Vec<MetricsRecord>,
    pub maintainability_index: Option<f64>,
    pub warnings: Vec<AnalysisWarning>,
}

#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    thresholds: MetricThresholds,
}

impl MetricsEngine {
    pub fn new(thresholds: MetricThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &MetricThresholds {
        &self.thresholds
    }

    pub fn measure_unit(&self, unit: &SourceUnit) -> UnitMetrics {
        let _span = tracing::debug_span!("measure_unit", path = %unit.path.display()).entered();

        let mut warnings = Vec::new();
        let records: Vec<MetricsRecord> = unit
            .functions
            .iter()
            .map(|decl| self.measure_function(unit, decl, &mut warnings))
            .collect();
        let maintainability_index = unit_maintainability(unit, &records);

        UnitMetrics {
            records,
            maintainability_index,
            warnings,
        }
    }

    pub fn measure_function(
        &self,
        unit: &SourceUnit,
        decl: &FunctionDecl,
        warnings: &mut Vec<AnalysisWarning>,
    ) -> MetricsRecord {
        let id = FunctionId::of(&unit.path, decl);
        let caps = unit.capabilities;
        let length = decl.span.len();
        let cyclomatic = calculate_cyclomatic(decl);

        let (loop_count, max_loop_depth, nested_loop_count) = if caps.loop_nesting {
            (decl.loops.len(), decl.max_loop_depth(), decl.nested_loop_count())
        } else {
            (0, 0, 0)
        };

        let comment_lines = if caps.comments {
            unit.comment_lines_in(decl.span)
        } else {
            0
        };
        let comment_ratio = comment_lines as f64 / length as f64;

        let maintainability_index = if caps.halstead {
            self.function_maintainability(unit, decl, &id, cyclomatic, comment_lines, warnings)
        } else {
            None
        };
        let low_maintainability =
            maintainability_index.is_some_and(|mi| mi < self.thresholds.low_maintainability);

        let mut critical_reasons = Vec::new();
        if cyclomatic > self.thresholds.complexity_critical {
            critical_reasons.push(CriticalReason::HighComplexity);
        }
        if length > self.thresholds.function_length_critical {
            critical_reasons.push(CriticalReason::LongFunction);
        }

        let complexity_label = ComplexityLabel::estimate(
            caps.loop_nesting.then_some(max_loop_depth),
            decl.is_recursive,
        );

        MetricsRecord {
            id,
            language: unit.language,
            length,
            parameter_count: decl.parameter_count,
            statement_count: decl.statement_count,
            cyclomatic,
            loop_count,
            max_loop_depth,
            nested_loop_count,
            comment_ratio,
            maintainability_index,
            low_maintainability,
            is_recursive: decl.is_recursive,
            critical: !critical_reasons.is_empty(),
            critical_reasons,
            unused: false,
            complexity_label,
        }
    }

    fn function_maintainability(
        &self,
        unit: &SourceUnit,
        decl: &FunctionDecl,
        id: &FunctionId,
        cyclomatic: u32,
        comment_lines: usize,
        warnings: &mut Vec<AnalysisWarning>,
    ) -> Option<f64> {
        let degraded = |reason: &str| AnalysisWarning::MetricDegraded {
            function: id.clone(),
            metric: "maintainability_index".to_string(),
            reason: reason.to_string(),
        };

        let Some(halstead) = decl.halstead else {
            warnings.push(degraded("missing Halstead counts"));
            return None;
        };

        let inputs = MaintainabilityInputs {
            halstead_volume: halstead.volume(),
            cyclomatic,
            source_lines: unit.code_lines_in(decl.span),
            comment_lines,
        };
        let mi = maintainability_index(&inputs);
        if mi.is_none() {
            tracing::debug!(function = %id, "maintainability index is not finite");
            warnings.push(degraded("non-finite result"));
        }
        mi
    }
}

/// The whole unit measured as one block: summed complexity over all code
/// lines, with the unit's Halstead counts.
fn unit_maintainability(unit: &SourceUnit, records: &[MetricsRecord]) -> Option<f64> {
    if !unit.capabilities.halstead {
        return None;
    }
    let halstead = unit.halstead?;
    let inputs = MaintainabilityInputs {
        halstead_volume: halstead.volume(),
        cyclomatic: combine_cyclomatic(records.iter().map(|r| r.cyclomatic)),
        source_lines: unit.code_line_count(),
        comment_lines: if unit.capabilities.comments {
            unit.comment_count
        } else {
            0
        },
    };
    maintainability_index(&inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        Capabilities, DecisionKind, HalsteadCounts, Language, LineKind, LineSpan, LoopDecl,
        LoopKind,
    };

    fn unit_with(decl: FunctionDecl, capabilities: Capabilities) -> SourceUnit {
        let mut kinds = vec![LineKind::Code; 30];
        kinds[1] = LineKind::Comment;
        let mut unit = SourceUnit::new("m.py", Language::Python, kinds);
        unit.capabilities = capabilities;
        unit.functions.push(decl);
        unit
    }

    fn nested_loop_function() -> FunctionDecl {
        let mut decl = FunctionDecl::new("printMatrix", LineSpan::new(1, 4));
        for (depth, line) in [(1, 2), (2, 3)] {
            decl.loops.push(LoopDecl {
                depth,
                kind: LoopKind::For,
                line,
            });
            decl.record_decision(DecisionKind::Loop, line);
        }
        decl.finish()
    }

    #[test]
    fn test_function_record_basics() {
        let unit = unit_with(nested_loop_function(), Capabilities::structural());
        let metrics = MetricsEngine::default().measure_unit(&unit);
        let record = &metrics.records[0];

        assert_eq!(record.cyclomatic, 3);
        assert_eq!(record.length, 4);
        assert_eq!(record.loop_count, 2);
        assert_eq!(record.max_loop_depth, 2);
        assert_eq!(record.nested_loop_count, 1);
        assert!((record.comment_ratio - 0.25).abs() < f64::EPSILON);
        assert_eq!(record.complexity_label.to_string(), "O(n^2)");
        assert_eq!(record.maintainability_index, None);
        assert!(!record.critical);
        assert!(!record.unused);
    }

    #[test]
    fn test_missing_loop_facet_defaults_to_zero() {
        let caps = Capabilities {
            loop_nesting: false,
            comments: false,
            halstead: false,
        };
        let unit = unit_with(nested_loop_function(), caps);
        let record = &MetricsEngine::default().measure_unit(&unit).records[0];
        assert_eq!(record.loop_count, 0);
        assert_eq!(record.max_loop_depth, 0);
        assert_eq!(record.comment_ratio, 0.0);
        assert_eq!(record.complexity_label, ComplexityLabel::Unknown);
    }

    #[test]
    fn test_critical_thresholds() {
        let mut decl = FunctionDecl::new("big", LineSpan::new(1, 25));
        for line in 2..13 {
            decl.record_decision(DecisionKind::If, line);
        }
        let unit = unit_with(decl.finish(), Capabilities::structural());
        let record = &MetricsEngine::default().measure_unit(&unit).records[0];
        assert_eq!(record.cyclomatic, 12);
        assert!(record.critical);
        assert_eq!(
            record.critical_reasons,
            vec![CriticalReason::HighComplexity, CriticalReason::LongFunction]
        );

        let lenient = MetricsEngine::new(MetricThresholds {
            complexity_critical: 20,
            function_length_critical: 40,
            ..Default::default()
        });
        assert!(!lenient.measure_unit(&unit).records[0].critical);
    }

    #[test]
    fn test_maintainability_when_capable() {
        let mut decl = FunctionDecl::new("f", LineSpan::new(1, 3));
        decl.halstead = Some(HalsteadCounts {
            distinct_operators: 3,
            distinct_operands: 4,
            total_operators: 5,
            total_operands: 7,
        });
        let mut unit = unit_with(decl, Capabilities::structural().with_halstead());
        unit.halstead = Some(HalsteadCounts {
            distinct_operators: 5,
            distinct_operands: 8,
            total_operators: 12,
            total_operands: 15,
        });

        let metrics = MetricsEngine::default().measure_unit(&unit);
        let mi = metrics.records[0].maintainability_index.unwrap();
        assert!((0.0..=100.0).contains(&mi));
        assert!(!metrics.records[0].low_maintainability);
        assert!(metrics.maintainability_index.is_some());
        assert!(metrics.warnings.is_empty());
    }

    #[test]
    fn test_dense_function_is_low_maintainability() {
        let mut decl = FunctionDecl::new("dense", LineSpan::new(1, 25));
        for line in 2..18 {
            decl.record_decision(DecisionKind::If, line);
        }
        decl.halstead = Some(HalsteadCounts {
            distinct_operators: 40,
            distinct_operands: 60,
            total_operators: 1500,
            total_operands: 2500,
        });
        let unit = unit_with(decl.finish(), Capabilities::structural().with_halstead());

        let record = &MetricsEngine::default().measure_unit(&unit).records[0];
        let mi = record.maintainability_index.unwrap();
        assert!(mi < 60.0, "mi = {mi}");
        assert!(record.low_maintainability);

        let lenient = MetricsEngine::new(MetricThresholds {
            low_maintainability: 10.0,
            ..Default::default()
        });
        assert!(!lenient.measure_unit(&unit).records[0].low_maintainability);
    }

    #[test]
    fn test_missing_halstead_counts_degrade_with_warning() {
        let decl = FunctionDecl::new("f", LineSpan::new(1, 3));
        let unit = unit_with(decl, Capabilities::structural().with_halstead());
        let metrics = MetricsEngine::default().measure_unit(&unit);
        assert_eq!(metrics.records[0].maintainability_index, None);
        assert!(matches!(
            metrics.warnings.as_slice(),
            [AnalysisWarning::MetricDegraded { metric, .. }] if metric == "maintainability_index"
        ));
    }
}
