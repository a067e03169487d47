//! LCOV tracefile writer
//!
//! ## LCOV Format
//!
//! ```text
//! TN:<test name>
//! SF:<source file>
//! DA:<line>,<execution count>
//! LF:<lines found>
//! LH:<lines hit>
//! end_of_record
//! ```
//!
//! Only line records are written; region data has no LCOV equivalent.

use super::FileReport;
use crate::result::LinecovResult;
use std::path::Path;

/// File name of the tracefile inside the target directory
pub const LCOV_FILE: &str = "lcov.info";

/// LCOV format report generator
#[derive(Debug)]
pub struct LcovFormatter<'a> {
    files: &'a [FileReport],
    test_name: Option<String>,
}

impl<'a> LcovFormatter<'a> {
    /// Create a new LCOV formatter over per-file results
    #[must_use]
    pub const fn new(files: &'a [FileReport]) -> Self {
        Self {
            files,
            test_name: None,
        }
    }

    /// Set the test name for the report
    #[must_use]
    pub fn with_test_name(mut self, name: impl Into<String>) -> Self {
        self.test_name = Some(name.into());
        self
    }

    /// Generate LCOV format report as a string
    #[must_use]
    pub fn generate(&self) -> String {
        use std::fmt::Write;

        let mut output = String::new();

        // Test name (TN)
        if let Some(ref name) = self.test_name {
            let _ = writeln!(output, "TN:{name}");
        } else {
            output.push_str("TN:\n");
        }

        let mut files: Vec<&FileReport> = self.files.iter().collect();
        files.sort_by(|a, b| a.source.cmp(&b.source));

        for file in files {
            let _ = writeln!(output, "SF:{}", file.source);

            for (line, count) in &file.line_counts {
                let _ = writeln!(output, "DA:{line},{count}");
            }

            let _ = writeln!(output, "LF:{}", file.totals.executable_lines);
            let _ = writeln!(output, "LH:{}", file.totals.hit_lines);

            output.push_str("end_of_record\n");
        }

        output
    }

    /// Save the LCOV report to a file
    ///
    /// # Errors
    ///
    /// Returns error if file write fails
    pub fn save(&self, path: &Path) -> LinecovResult<()> {
        let content = self.generate();
        std::fs::write(path, content)?;
        Ok(())
    }
}
