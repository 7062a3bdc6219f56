//! Tracing subscriber setup
//!
//! The library only emits `tracing` events; binaries and test harnesses call
//! [`init_tracing`] once to see them. `RUST_LOG` wins over the filter passed
//! in.

use serde::{Deserialize, Serialize};
use std::io;
use tracing_subscriber::EnvFilter;

/// Output format of the subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Install a global fmt subscriber writing to stderr.
///
/// `default_filter` is an `EnvFilter` directive such as `"pomkit=debug"`,
/// used when `RUST_LOG` is unset. Returns `false` if a subscriber was
/// already installed, which makes repeated calls harmless.
pub fn init_tracing(default_filter: &str, format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true);

    match format {
        LogFormat::Pretty => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    }
}
