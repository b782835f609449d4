//! Recognized analysis options.
//!
//! Every field has a serde default, so an empty `.codegauge.toml` and
//! `AnalysisConfig::default()` describe the same run.

use crate::core::AnalysisError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub fn default_entry_point_names() -> BTreeSet<String> {
    BTreeSet::from(["main".to_string()])
}

pub fn default_complexity_critical_threshold() -> u32 {
    10
}

pub fn default_function_length_critical_threshold() -> usize {
    20
}

pub fn default_long_function_lines() -> usize {
    50
}

pub fn default_low_maintainability_threshold() -> f64 {
    60.0
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Function names treated as reachability roots.
    #[serde(default = "default_entry_point_names")]
    pub entry_point_names: BTreeSet<String>,

    /// Functions above this cyclomatic complexity are critical.
    #[serde(default = "default_complexity_critical_threshold")]
    pub complexity_critical_threshold: u32,

    /// Functions longer than this many lines are critical.
    #[serde(default = "default_function_length_critical_threshold")]
    pub function_length_critical_threshold: usize,

    /// Length above which a unit summary suggests splitting a function.
    #[serde(default = "default_long_function_lines")]
    pub long_function_lines: usize,

    #[serde(default = "default_low_maintainability_threshold")]
    pub low_maintainability_threshold: f64,

    /// Resolve call names against every analyzed unit, not just the caller's.
    pub cross_unit_resolution: bool,

    /// Treat exported/public functions as reachability roots.
    pub exported_entry_points: bool,

    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Glob patterns excluded by the file walker.
    pub ignore: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            entry_point_names: default_entry_point_names(),
            complexity_critical_threshold: default_complexity_critical_threshold(),
            function_length_critical_threshold: default_function_length_critical_threshold(),
            long_function_lines: default_long_function_lines(),
            low_maintainability_threshold: default_low_maintainability_threshold(),
            cross_unit_resolution: false,
            exported_entry_points: false,
            parallel: true,
            ignore: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    /// Check every option and report all problems at once.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let mut errors = Vec::new();

        if self.complexity_critical_threshold == 0 {
            errors.push("complexity_critical_threshold must be at least 1".to_string());
        }
        if self.function_length_critical_threshold == 0 {
            errors.push("function_length_critical_threshold must be at least 1".to_string());
        }
        if self.long_function_lines == 0 {
            errors.push("long_function_lines must be at least 1".to_string());
        }
        if !(0.0..=100.0).contains(&self.low_maintainability_threshold) {
            errors.push(format!(
                "low_maintainability_threshold must be within 0..=100, got {}",
                self.low_maintainability_threshold
            ));
        }
        if self.entry_point_names.iter().any(|n| n.trim().is_empty()) {
            errors.push("entry_point_names must not contain blank names".to_string());
        }
        for pattern in &self.ignore {
            if let Err(e) = glob::Pattern::new(pattern) {
                errors.push(format!("invalid ignore pattern `{pattern}`: {e}"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AnalysisError::Configuration(errors))
        }
    }
}
