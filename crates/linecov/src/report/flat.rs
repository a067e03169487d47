//! Flat `file:line` lists
//!
//! `hits` and `notreached` list one executable line per row, grouped by file
//! name in sorted order, for consumption by scripts.

use crate::annotate::{Aggregator, FileCoverage};
use std::fmt::Write;

/// File name of the executed-lines list
pub const HITS_FILE: &str = "hits";
/// File name of the never-executed-lines list
pub const NOT_REACHED_FILE: &str = "notreached";

/// Every executed line as `file:line`
#[must_use]
pub fn hits_list(coverage: &Aggregator) -> String {
    render(coverage, |file| &file.hits)
}

/// Every executable line that never ran as `file:line`
#[must_use]
pub fn not_reached_list(coverage: &Aggregator) -> String {
    render(coverage, |file| &file.misses)
}

fn render(coverage: &Aggregator, lines: impl Fn(&FileCoverage) -> &Vec<u32>) -> String {
    let mut out = String::new();
    for (name, file) in coverage.files() {
        for line in lines(file) {
            let _ = writeln!(out, "{name}:{line}");
        }
    }
    out
}
