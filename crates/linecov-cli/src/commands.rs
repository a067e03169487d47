//! CLI command definitions using clap

use clap::{Args, Parser, ValueEnum};
use linecov::DEFAULT_LLVM_COV;
use std::path::PathBuf;

/// Linecov: annotated HTML coverage reports from LLVM source-based coverage
#[derive(Parser, Debug)]
#[command(name = "linecov")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Report settings
    #[command(flatten)]
    pub report: ReportArgs,
}

/// Arguments of a report run
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Directory receiving the report
    #[arg(value_name = "TARGET_DIR")]
    pub target_dir: PathBuf,

    /// Instrumented executable
    #[arg(value_name = "EXECUTABLE")]
    pub executable: PathBuf,

    /// Merged profile data (e.g. default.profdata)
    #[arg(value_name = "PROFDATA")]
    pub profdata: PathBuf,

    /// Project root stripped from file names (detected when omitted)
    #[arg(long, alias = "projectroot", value_name = "DIR")]
    pub project_root: Option<String>,

    /// Extra text that excludes a line, like LCOV_EXCL_LINE (repeatable)
    #[arg(long, value_name = "TEXT")]
    pub exclude_line: Vec<String>,

    /// Comma separated directories, relative to the project root, to leave out
    #[arg(long, value_name = "DIRS")]
    pub exclude_dir: Vec<String>,

    /// Read a pre-exported `llvm-cov export -format=text` file instead of running llvm-cov
    #[arg(long, value_name = "FILE")]
    pub export_json: Option<PathBuf>,

    /// llvm-cov executable
    #[arg(long, env = "LLVM_COV", default_value = DEFAULT_LLVM_COV, value_name = "PATH")]
    pub llvm_cov: PathBuf,

    /// Also write an LCOV tracefile (lcov.info)
    #[arg(long)]
    pub lcov: bool,

    /// Also write a JSON summary (summary.json)
    #[arg(long)]
    pub json_summary: bool,
}

/// Color argument for CLI
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
