//! linecov: annotated HTML coverage reports from LLVM source-based coverage
//!
//! ## Usage
//!
//! ```bash
//! linecov out/ ./app default.profdata                 # Run llvm-cov and write out/
//! linecov --lcov --json-summary out/ ./app default.profdata
//! linecov --export-json cov.json out/ ./app default.profdata
//! ```

use clap::Parser;
use linecov_cli::{
    handlers::execute_report, logging::init_logging, Cli, CliConfig, CliResult, ColorChoice,
    Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli);
    match config.color {
        ColorChoice::Always => console::set_colors_enabled(true),
        ColorChoice::Never => console::set_colors_enabled(false),
        ColorChoice::Auto => {}
    }
    init_logging(&config)?;

    execute_report(&config, &cli.report)?;
    Ok(())
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.into();
    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_defaults() {
        let cli = Cli::parse_from(["linecov", "out", "app", "p.profdata"]);
        let config = build_config(&cli);
        assert_eq!(config.verbosity, Verbosity::Normal);
        assert_eq!(config.color, ColorChoice::Auto);
    }

    #[test]
    fn test_build_config_quiet_wins() {
        let cli = Cli::parse_from(["linecov", "-q", "-vv", "--color", "never", "out", "app", "p"]);
        let config = build_config(&cli);
        assert_eq!(config.verbosity, Verbosity::Quiet);
        assert_eq!(config.color, ColorChoice::Never);
    }

    #[test]
    fn test_build_config_debug() {
        let cli = Cli::parse_from(["linecov", "-vv", "out", "app", "p"]);
        assert_eq!(build_config(&cli).verbosity, Verbosity::Debug);
    }
}
