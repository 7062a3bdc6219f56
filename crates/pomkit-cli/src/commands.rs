//! CLI command definitions using clap

use crate::config::ColorChoice;
use clap::{Parser, Subcommand, ValueEnum};
use pomkit::{LogFormat, StepDelay};
use std::path::PathBuf;

/// Pomkit: check selector mappings and step plans for UI end-to-end tests
#[derive(Parser, Debug)]
#[command(name = "pomkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Log event format
    #[arg(long, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a feature mapping file and print its features
    Check(CheckArgs),

    /// Resolve a feature element to its selector
    Lookup(LookupArgs),

    /// Validate a step plan and print its schedule
    Plan(PlanArgs),
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Feature mapping file (JSON or YAML)
    pub file: PathBuf,
}

/// Arguments for the lookup command
#[derive(Parser, Debug)]
pub struct LookupArgs {
    /// Feature mapping file (JSON or YAML)
    pub file: PathBuf,

    /// Feature name
    pub feature: String,

    /// Element name within the feature
    pub element: String,
}

/// Arguments for the plan command
#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Step plan file (YAML, or JSON with a .json extension)
    pub file: PathBuf,

    /// Feature mapping used to check feature targets
    #[arg(short, long)]
    pub features: Option<PathBuf>,

    /// Delay for plans that declare none (e.g. 300, 250ms, 1s).
    /// Defaults to POM_STEP_DELAY_MS, then 300ms
    #[arg(short, long)]
    pub delay: Option<StepDelay>,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Log format argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormatArg {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_cli_definition_is_valid() {
            Cli::command().debug_assert();
        }

        #[test]
        fn test_parse_lookup() {
            let cli = Cli::parse_from(["pomkit", "lookup", "features.json", "HOME", "ITEMS"]);
            match cli.command {
                Commands::Lookup(args) => {
                    assert_eq!(args.file, PathBuf::from("features.json"));
                    assert_eq!(args.feature, "HOME");
                    assert_eq!(args.element, "ITEMS");
                }
                other => panic!("unexpected command {other:?}"),
            }
        }

        #[test]
        fn test_parse_plan_delay_forms() {
            let cli = Cli::parse_from(["pomkit", "plan", "plan.yaml", "--delay", "250ms"]);
            match cli.command {
                Commands::Plan(args) => {
                    assert_eq!(args.delay, Some(StepDelay::from_millis(250)));
                    assert!(args.features.is_none());
                }
                other => panic!("unexpected command {other:?}"),
            }
        }

        #[test]
        fn test_reject_bad_delay() {
            let result = Cli::try_parse_from(["pomkit", "plan", "plan.yaml", "--delay", "soon"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_global_flags() {
            let cli = Cli::parse_from(["pomkit", "-vv", "--color", "never", "check", "f.json"]);
            assert_eq!(cli.verbose, 2);
            assert!(!cli.quiet);
            assert_eq!(ColorChoice::from(cli.color), ColorChoice::Never);
        }
    }
}
