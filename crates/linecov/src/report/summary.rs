//! Machine readable run summary (`summary.json`)

use super::ReportSummary;
use crate::annotate::{CoverageTotals, PerMille};
use crate::result::LinecovResult;
use serde::Serialize;
use std::path::Path;

/// File name of the JSON summary inside the target directory
pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Debug, Serialize)]
struct TotalsView {
    hit_lines: u32,
    executable_lines: u32,
    missed_lines: u32,
    per_mille: PerMille,
}

impl From<CoverageTotals> for TotalsView {
    fn from(totals: CoverageTotals) -> Self {
        Self {
            hit_lines: totals.hit_lines,
            executable_lines: totals.executable_lines,
            missed_lines: totals.missed_lines(),
            per_mille: totals.percentage(),
        }
    }
}

#[derive(Debug, Serialize)]
struct FileView<'a> {
    file: &'a str,
    name: &'a str,
    page: &'a str,
    #[serde(flatten)]
    totals: TotalsView,
}

#[derive(Debug, Serialize)]
struct SummaryView<'a> {
    command: &'a str,
    timestamp: &'a str,
    totals: TotalsView,
    files: Vec<FileView<'a>>,
    missing_sources: &'a [String],
}

/// Render `summary` as pretty-printed JSON
///
/// # Errors
///
/// Returns error if serialization fails
pub fn render_summary(summary: &ReportSummary) -> LinecovResult<String> {
    let view = SummaryView {
        command: &summary.command,
        timestamp: &summary.timestamp,
        totals: summary.totals.into(),
        files: summary
            .files
            .iter()
            .map(|file| FileView {
                file: &file.source,
                name: &file.pretty_name,
                page: &file.page,
                totals: file.totals.into(),
            })
            .collect(),
        missing_sources: &summary.missing,
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

/// Write the JSON summary to `path`
///
/// # Errors
///
/// Returns error if serialization or the file write fails
pub fn save_summary(summary: &ReportSummary, path: &Path) -> LinecovResult<()> {
    std::fs::write(path, render_summary(summary)?)?;
    Ok(())
}
