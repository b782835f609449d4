use anyhow::{Context, Result};
use clap::Parser;
use codegauge::cli::{AnalyzeArgs, Cli, Commands};
use codegauge::config::load_config;
use codegauge::io::{collect_inputs, create_writer};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze(args) => handle_analyze_command(&args),
    }
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_analyze_command(args: &AnalyzeArgs) -> Result<()> {
    let config = args.apply_overrides(load_config(args.config.as_deref())?);
    config.validate()?;

    let inputs = collect_inputs(&args.paths, &config.ignore)?;
    let report = codegauge::analyze(&inputs, &config).context("Analysis failed")?;

    let stdout = std::io::stdout();
    let mut writer = create_writer(args.format, stdout.lock());
    writer.write_report(&report)
}
