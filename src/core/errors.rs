//! Shared error types for the analysis core

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// A single unit could not be structured into a `SourceUnit`.
///
/// Parse errors are isolated per unit: the run records them and continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Parse error in {}{}: {message}", .path.display(), .line.map(|l| format!(":{l}")).unwrap_or_default())]
pub struct ParseError {
    pub path: PathBuf,
    pub line: Option<usize>,
    pub message: String,
}

impl ParseError {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line: None,
            message: message.into(),
        }
    }

    pub fn at_line(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line: Some(line),
            message: message.into(),
        }
    }
}

/// Errors that abort a whole analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// One or more recognized options had invalid values.
    #[error("Configuration error: {}", .0.join("; "))]
    Configuration(Vec<String>),

    /// The run was started without any units.
    #[error("No source units to analyze")]
    NoInput,
}

impl AnalysisError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(vec![message.into()])
    }
}

/// Result type alias using the fatal error type
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_with_line() {
        let err = ParseError::at_line("src/a.py", 12, "unexpected token");
        assert_eq!(err.to_string(), "Parse error in src/a.py:12: unexpected token");
    }

    #[test]
    fn test_parse_error_display_without_line() {
        let err = ParseError::new("b.js", "unsupported language");
        assert_eq!(err.to_string(), "Parse error in b.js: unsupported language");
    }

    #[test]
    fn test_configuration_error_joins_messages() {
        let err = AnalysisError::Configuration(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "Configuration error: a; b");
    }
}
