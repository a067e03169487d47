//! Report command handler

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use crate::ReportArgs;
use linecov::report::paths::split_exclude_dirs;
use linecov::{
    file_timestamp, ExclusionMarkers, LlvmCovTool, LlvmExport, ReportConfig, ReportGenerator,
    ReportSummary,
};
use tracing::{debug, info};

/// Library settings for `args`
#[must_use]
pub fn build_report_config(args: &ReportArgs) -> ReportConfig {
    let exclude_dirs = args
        .exclude_dir
        .iter()
        .flat_map(|value| split_exclude_dirs(value))
        .collect();

    let mut config = ReportConfig::new(&args.target_dir)
        .with_command(args.executable.display().to_string())
        .with_timestamp(file_timestamp(&args.profdata))
        .with_markers(ExclusionMarkers::new(args.exclude_line.iter().cloned()))
        .with_exclude_dirs(exclude_dirs)
        .with_lcov(args.lcov)
        .with_json_summary(args.json_summary);
    if let Some(ref root) = args.project_root {
        config = config.with_project_root(root.as_str());
    }
    config
}

/// Load coverage from `--export-json` or by running llvm-cov
pub fn load_export(args: &ReportArgs) -> CliResult<LlvmExport> {
    if let Some(ref path) = args.export_json {
        debug!(path = %path.display(), "reading exported coverage");
        return Ok(LlvmExport::from_path(path)?);
    }
    let tool = LlvmCovTool::new(&args.llvm_cov);
    Ok(tool.export(&args.executable, &args.profdata)?)
}

/// Execute a report run
pub fn execute_report(config: &CliConfig, args: &ReportArgs) -> CliResult<ReportSummary> {
    if args.target_dir.is_file() {
        return Err(CliError::invalid_argument(format!(
            "target {} is a file, expected a directory",
            args.target_dir.display()
        )));
    }

    let mut reporter =
        ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    if config.verbosity.is_verbose() {
        reporter.info(&format!(
            "Loading coverage of {}",
            args.executable.display()
        ));
    }
    let export = load_export(args)?;
    info!(files = export.len(), "coverage loaded");

    let generator = ReportGenerator::new(build_report_config(args));
    reporter.start_progress(export.len() as u64, "Annotating");
    let result = generator.generate_with_progress(&export, |file| {
        reporter.set_message(file);
        reporter.increment(1);
    });
    reporter.finish();
    let summary = result.map_err(|e| {
        CliError::report_generation(format!("{}: {e}", args.target_dir.display()))
    })?;

    for file in &summary.missing {
        reporter.warning(&format!("No source code found for {file}"));
    }
    if config.verbosity.is_verbose() {
        reporter.success(&format!(
            "Wrote {} file pages to {}",
            summary.files.len(),
            args.target_dir.display()
        ));
    }
    reporter.summary(&summary);
    Ok(summary)
}
