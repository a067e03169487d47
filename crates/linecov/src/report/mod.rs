//! Report generation
//!
//! Drives every instrumented file through the annotation engine and writes
//! the artefacts of one run into a target directory:
//!
//! ```text
//! <target>/index.html        files sorted by coverage, with search box
//! <target>/<page>.html       one annotated page per file
//! <target>/linecov.css       stylesheet
//! <target>/hits              file:line of every executed line
//! <target>/notreached        file:line of every executable line never run
//! <target>/lcov.info         optional LCOV tracefile
//! <target>/summary.json      optional JSON summary
//! ```

pub mod flat;
pub mod html;
pub mod lcov;
pub mod paths;
pub mod summary;

use crate::annotate::{
    annotate_source, Aggregator, CoverageTotals, ExclusionMarkers, FileAnnotation, PerMille,
};
use crate::export::CoverageSource;
use crate::result::LinecovResult;
use chrono::{DateTime, Local};
use html::PageHeader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name of the index page
pub const INDEX_FILE: &str = "index.html";

/// Settings of one report run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Directory receiving all artefacts
    pub target_dir: PathBuf,
    /// Instrumented binary, shown as the command in page headers
    pub command: String,
    /// Profile timestamp shown in page headers
    pub timestamp: String,
    /// Explicit project root; detected from the file list when `None`
    pub project_root: Option<String>,
    /// Extra single-line exclusion markers
    pub markers: ExclusionMarkers,
    /// Directories (relative to the project root) left out of the report
    pub exclude_dirs: Vec<String>,
    /// Also write `lcov.info`
    pub lcov: bool,
    /// Also write `summary.json`
    pub json_summary: bool,
}

impl ReportConfig {
    /// Create a config writing into `target_dir`
    #[must_use]
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            command: String::new(),
            timestamp: String::new(),
            project_root: None,
            markers: ExclusionMarkers::default(),
            exclude_dirs: Vec::new(),
            lcov: false,
            json_summary: false,
        }
    }

    /// Set the command shown in page headers
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Set the timestamp shown in page headers
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Use an explicit project root
    #[must_use]
    pub fn with_project_root(mut self, root: impl Into<String>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    /// Set extra exclusion markers
    #[must_use]
    pub fn with_markers(mut self, markers: ExclusionMarkers) -> Self {
        self.markers = markers;
        self
    }

    /// Set excluded directories
    #[must_use]
    pub fn with_exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.exclude_dirs = dirs;
        self
    }

    /// Enable the LCOV tracefile
    #[must_use]
    pub const fn with_lcov(mut self, enabled: bool) -> Self {
        self.lcov = enabled;
        self
    }

    /// Enable the JSON summary
    #[must_use]
    pub const fn with_json_summary(mut self, enabled: bool) -> Self {
        self.json_summary = enabled;
        self
    }
}

/// Result for one file that made it into the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Source path as recorded in the profile
    pub source: String,
    /// Display name
    pub pretty_name: String,
    /// Page file name inside the target directory
    pub page: String,
    /// Hit and executable lines
    pub totals: CoverageTotals,
    /// Coverage of the file
    pub percentage: PerMille,
    /// `(line, count)` of every executable line; missed lines have count 0
    pub line_counts: Vec<(u32, u64)>,
}

/// What happened to one instrumented file
#[derive(Debug)]
pub enum SourceOutcome {
    /// Below an excluded directory
    Excluded,
    /// Source could not be read
    Missing(std::io::Error),
    /// Read and annotated, but without a single executable line
    NotExecutable,
    /// Annotated with at least one executable line
    Annotated(FileAnnotation),
}

/// Outcome of a complete run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    /// Command shown in the headers
    pub command: String,
    /// Profile timestamp
    pub timestamp: String,
    /// Totals over all reported files
    pub totals: CoverageTotals,
    /// Reported files in index order
    pub files: Vec<FileReport>,
    /// Sources that could not be read
    pub missing: Vec<String>,
    /// Sources skipped because of an excluded directory
    pub excluded: Vec<String>,
}

impl ReportSummary {
    /// Coverage over all reported files
    #[must_use]
    pub fn percentage(&self) -> PerMille {
        self.totals.percentage()
    }

    /// One-line console summary
    #[must_use]
    pub fn console_line(&self) -> String {
        format!(
            "coverage: {}%, {} lines not reached",
            self.percentage(),
            self.totals.missed_lines()
        )
    }
}

/// Writes HTML, flat lists and optional machine-readable reports
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    config: ReportConfig,
}

impl ReportGenerator {
    /// Create a generator for `config`
    #[must_use]
    pub const fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// The run settings
    #[must_use]
    pub const fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Read and annotate one file
    pub fn process_file<S>(&self, source: &S, file: &str, root: &str) -> SourceOutcome
    where
        S: CoverageSource + ?Sized,
    {
        if paths::is_excluded_dir(file, root, &self.config.exclude_dirs) {
            return SourceOutcome::Excluded;
        }
        let bytes = match std::fs::read(file) {
            Ok(bytes) => bytes,
            Err(err) => return SourceOutcome::Missing(err),
        };
        let events = source.events(file);
        let annotation = annotate_source(&bytes, &self.config.markers, &events);
        if annotation.totals().executable_lines == 0 {
            SourceOutcome::NotExecutable
        } else {
            SourceOutcome::Annotated(annotation)
        }
    }

    /// Generate the complete report
    ///
    /// # Errors
    ///
    /// Returns error if an artefact cannot be written
    pub fn generate<S>(&self, source: &S) -> LinecovResult<ReportSummary>
    where
        S: CoverageSource + ?Sized,
    {
        self.generate_with_progress(source, |_| {})
    }

    /// Generate the complete report, calling `on_file` before each file
    ///
    /// # Errors
    ///
    /// Returns error if an artefact cannot be written
    pub fn generate_with_progress<S, F>(
        &self,
        source: &S,
        mut on_file: F,
    ) -> LinecovResult<ReportSummary>
    where
        S: CoverageSource + ?Sized,
        F: FnMut(&str),
    {
        let files = source.files();
        let root = self
            .config
            .project_root
            .as_deref()
            .map_or_else(|| paths::detect_project_root(files), paths::normalize_root);
        debug!(%root, files = files.len(), "generating report");
        std::fs::create_dir_all(&self.config.target_dir)?;

        let mut coverage = Aggregator::new();
        let mut reports = Vec::new();
        let mut missing = Vec::new();
        let mut excluded = Vec::new();

        for file in files {
            on_file(file);
            match self.process_file(source, file, &root) {
                SourceOutcome::Excluded => {
                    debug!(%file, "excluded directory");
                    excluded.push(file.clone());
                }
                SourceOutcome::Missing(err) => {
                    debug!(%file, error = %err, "source not readable, skipping");
                    missing.push(file.clone());
                }
                SourceOutcome::NotExecutable => {
                    debug!(%file, "no executable lines");
                }
                SourceOutcome::Annotated(annotation) => {
                    let names = paths::page_names(file, &root);
                    let totals = annotation.totals();
                    let header = PageHeader {
                        command: &self.config.command,
                        timestamp: &self.config.timestamp,
                        file: Some(names.pretty_name.as_str()),
                        totals,
                        search: false,
                    };
                    self.write_artifact(&names.page, &html::file_page(&header, &annotation))?;

                    let line_counts = annotation
                        .lines
                        .iter()
                        .map(|line| line.classification)
                        .filter(|stats| stats.executable)
                        .map(|stats| {
                            let count = if stats.hit { stats.max_count } else { 0 };
                            (stats.line_number, count)
                        })
                        .collect();
                    coverage.add_file(file.clone(), annotation.coverage);
                    reports.push(FileReport {
                        source: file.clone(),
                        pretty_name: names.pretty_name,
                        page: names.page,
                        totals,
                        percentage: totals.percentage(),
                        line_counts,
                    });
                }
            }
        }

        reports.sort_by(|a, b| {
            a.percentage
                .cmp(&b.percentage)
                .then_with(|| a.pretty_name.cmp(&b.pretty_name))
        });

        let summary = ReportSummary {
            command: self.config.command.clone(),
            timestamp: self.config.timestamp.clone(),
            totals: coverage.totals(),
            files: reports,
            missing,
            excluded,
        };

        let header = PageHeader {
            command: &summary.command,
            timestamp: &summary.timestamp,
            file: None,
            totals: summary.totals,
            search: true,
        };
        self.write_artifact(INDEX_FILE, &html::index_page(&header, &summary.files))?;
        self.write_artifact(flat::HITS_FILE, &flat::hits_list(&coverage))?;
        self.write_artifact(flat::NOT_REACHED_FILE, &flat::not_reached_list(&coverage))?;
        self.write_artifact(html::STYLESHEET_NAME, html::STYLESHEET)?;

        if self.config.lcov {
            let path = self.config.target_dir.join(lcov::LCOV_FILE);
            lcov::LcovFormatter::new(&summary.files).save(&path)?;
            info!(path = %path.display(), "wrote LCOV tracefile");
        }
        if self.config.json_summary {
            let path = self.config.target_dir.join(summary::SUMMARY_FILE);
            summary::save_summary(&summary, &path)?;
            info!(path = %path.display(), "wrote JSON summary");
        }

        info!(
            files = summary.files.len(),
            hit = summary.totals.hit_lines,
            executable = summary.totals.executable_lines,
            "report written to {}",
            self.config.target_dir.display()
        );
        Ok(summary)
    }

    fn write_artifact(&self, name: &str, content: &str) -> LinecovResult<()> {
        let path = self.config.target_dir.join(name);
        std::fs::write(&path, content)?;
        debug!(path = %path.display(), bytes = content.len(), "wrote artefact");
        Ok(())
    }
}

/// Modification time of `path` in `ctime` style, empty if unavailable
#[must_use]
pub fn file_timestamp(path: &Path) -> String {
    std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map(|time| {
            DateTime::<Local>::from(time)
                .format("%a %b %e %H:%M:%S %Y")
                .to_string()
        })
        .unwrap_or_default()
}
