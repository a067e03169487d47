//! Aggregator
//!
//! Per-file and global hit/miss bookkeeping. Everything here is append-only:
//! a file's [`FileCoverage`] is built by one scan and then folded into the
//! [`Aggregator`], so files can be scanned independently and merged after.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Hit and executable line counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageTotals {
    /// Executable lines with at least one hit
    pub hit_lines: u32,
    /// Executable lines
    pub executable_lines: u32,
}

impl CoverageTotals {
    /// Create totals from raw counts
    #[must_use]
    pub const fn new(hit_lines: u32, executable_lines: u32) -> Self {
        Self {
            hit_lines,
            executable_lines,
        }
    }

    /// Count one executable line
    pub fn record(&mut self, hit: bool) {
        self.executable_lines += 1;
        if hit {
            self.hit_lines += 1;
        }
    }

    /// Add another set of totals
    pub fn merge(&mut self, other: Self) {
        self.hit_lines += other.hit_lines;
        self.executable_lines += other.executable_lines;
    }

    /// Executable lines that never ran
    #[must_use]
    pub const fn missed_lines(&self) -> u32 {
        self.executable_lines.saturating_sub(self.hit_lines)
    }

    /// Coverage in per-mille
    #[must_use]
    pub fn percentage(&self) -> PerMille {
        compute_percentage(self.hit_lines, self.executable_lines)
    }
}

/// Coverage of one source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCoverage {
    /// Executed line numbers in ascending order
    pub hits: Vec<u32>,
    /// Executable but never executed line numbers in ascending order
    pub misses: Vec<u32>,
    /// Counts over both lists
    pub totals: CoverageTotals,
}

impl FileCoverage {
    /// Record an executable line
    pub fn record_line(&mut self, line_number: u32, hit: bool) {
        if hit {
            self.hits.push(line_number);
        } else {
            self.misses.push(line_number);
        }
        self.totals.record(hit);
    }

    fn append(&mut self, other: Self) {
        self.hits.extend(other.hits);
        self.misses.extend(other.misses);
        self.totals.merge(other.totals);
    }
}

/// Coverage across all files of a run, keyed by file name
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    files: BTreeMap<String, FileCoverage>,
    totals: CoverageTotals,
}

impl Aggregator {
    /// Create an empty aggregator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one executable line of `file`
    pub fn record_line(&mut self, file: &str, line_number: u32, hit: bool) {
        self.files
            .entry(file.to_string())
            .or_default()
            .record_line(line_number, hit);
        self.totals.record(hit);
    }

    /// Fold a complete per-file result into the run
    pub fn add_file(&mut self, file: impl Into<String>, coverage: FileCoverage) {
        self.totals.merge(coverage.totals);
        self.files.entry(file.into()).or_default().append(coverage);
    }

    /// Coverage of one file
    #[must_use]
    pub fn file(&self, file: &str) -> Option<&FileCoverage> {
        self.files.get(file)
    }

    /// All files in name order
    pub fn files(&self) -> impl Iterator<Item = (&str, &FileCoverage)> {
        self.files.iter().map(|(name, cov)| (name.as_str(), cov))
    }

    /// Totals over every recorded file
    #[must_use]
    pub const fn totals(&self) -> CoverageTotals {
        self.totals
    }
}

/// A fixed-point percentage with one decimal, stored as per-mille
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PerMille(u32);

impl PerMille {
    /// Wrap a raw per-mille value
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw per-mille value, `0..=1000`
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Value as a percentage
    #[must_use]
    pub fn percent(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl fmt::Display for PerMille {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// `hit / executable` in per-mille, floored.
///
/// Zero if either input is zero. A nonzero ratio never floors to zero, so a
/// file with one hit line never shows `0.0`.
#[must_use]
pub fn compute_percentage(hit: u32, executable: u32) -> PerMille {
    if hit == 0 || executable == 0 {
        return PerMille(0);
    }
    let value = u64::from(hit) * 1000 / u64::from(executable);
    PerMille(value.max(1) as u32)
}
