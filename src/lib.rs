//! codegauge: function-level complexity, call graph and dead code analysis
//! for Python, JavaScript, Java and C sources.
//!
//! The single entry point is [`analyze`], a pure function from source inputs
//! and configuration to an [`AnalysisReport`].
//!
//! ```no_run
//! use codegauge::{analyze, AnalysisConfig, SourceInput};
//!
//! let inputs = vec![SourceInput::from_path("app.py", "def main():\n    pass\n")];
//! let report = analyze(&inputs, &AnalysisConfig::default())?;
//! for record in &report.records {
//!     println!("{} {} {}", record.id, record.cyclomatic, record.complexity_label);
//! }
//! # Ok::<(), codegauge::AnalysisError>(())
//! ```

pub mod analysis;
pub mod analyzers;
pub mod builders;
pub mod call_graph;
pub mod cli;
pub mod complexity;
pub mod config;
pub mod core;
pub mod io;
pub mod metrics;
pub mod report;

pub use crate::builders::analyze;
pub use crate::call_graph::{CallGraph, FunctionId};
pub use crate::complexity::ComplexityLabel;
pub use crate::config::AnalysisConfig;
pub use crate::core::{AnalysisError, Language, ParseError, SourceInput, SourceUnit};
pub use crate::report::{
    AnalysisReport, AnalysisWarning, MetricsRecord, Suggestion, UnitSummary, UnusedVariable,
};
