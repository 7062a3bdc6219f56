//! Pomkit CLI: check selector mappings and step plans
//!
//! ## Usage
//!
//! ```bash
//! pomkit check features.yaml                  # Validate a feature mapping
//! pomkit lookup features.yaml HOME ITEMS      # Print one selector
//! pomkit plan smoke.yaml --features f.yaml    # Validate a plan, show pacing
//! ```

use clap::Parser;
use pomkit::PomConfig;
use pomkit_cli::{handlers, Cli, CliConfig, CliResult, ColorChoice, Commands, Reporter, Verbosity};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = build_config(&cli);
    let _ = pomkit::init_tracing(config.verbosity.filter(), config.log_format);

    let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());
    match run(&cli, &reporter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            reporter.failure(&format!("Error: {e}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, reporter: &Reporter) -> CliResult<()> {
    match &cli.command {
        Commands::Check(args) => handlers::check(reporter, args),
        Commands::Lookup(args) => handlers::lookup(reporter, args),
        Commands::Plan(args) => handlers::plan(reporter, args, &PomConfig::from_env()?),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
        .with_log_format(cli.log_format.clone().into())
}
