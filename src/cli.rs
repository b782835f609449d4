use crate::config::AnalysisConfig;
use crate::io::OutputFormat;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "codegauge")]
#[command(about = "Function complexity, call graph and dead code analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze Python, JavaScript, Java and C sources
    Analyze(AnalyzeArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Files or directories to analyze
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    pub format: OutputFormat,

    /// Config file (defaults to the nearest .codegauge.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Cyclomatic complexity above which a function is critical
    #[arg(long)]
    pub threshold_complexity: Option<u32>,

    /// Entry point function names (replaces the configured set)
    #[arg(long = "entry-point")]
    pub entry_points: Vec<String>,

    /// Resolve calls across all analyzed files
    #[arg(long)]
    pub cross_unit: bool,

    /// Treat exported/public functions as entry points
    #[arg(long)]
    pub exported_entry_points: bool,

    /// Analyze on a single thread
    #[arg(long)]
    pub no_parallel: bool,
}

impl AnalyzeArgs {
    /// Command-line flags take precedence over the loaded configuration.
    pub fn apply_overrides(&self, mut config: AnalysisConfig) -> AnalysisConfig {
        if let Some(threshold) = self.threshold_complexity {
            config.complexity_critical_threshold = threshold;
        }
        if !self.entry_points.is_empty() {
            config.entry_point_names = self.entry_points.iter().cloned().collect();
        }
        if self.cross_unit {
            config.cross_unit_resolution = true;
        }
        if self.exported_entry_points {
            config.exported_entry_points = true;
        }
        if self.no_parallel {
            config.parallel = false;
        }
        config
    }
}
