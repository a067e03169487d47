//! Log subscriber setup

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use tracing_subscriber::EnvFilter;

/// Filter used for this run: `RUST_LOG` if set, else derived from verbosity
#[must_use]
pub fn log_filter(config: &CliConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_filter()))
}

/// Install the global fmt subscriber writing to stderr
pub fn init_logging(config: &CliConfig) -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(config))
        .with_writer(std::io::stderr)
        .with_ansi(config.color.should_color())
        .with_target(false)
        .try_init()
        .map_err(|e| CliError::config(format!("cannot install logger: {e}")))
}
