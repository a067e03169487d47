//! Coverage data providers
//!
//! The engine only needs two things from a profile: the list of source files
//! it covers and, per file, the ordered segment boundaries. [`CoverageSource`]
//! is that seam; [`LlvmExport`] implements it over the JSON written by
//! `llvm-cov export -format=text`, and [`LlvmCovTool`] produces that JSON.

mod command;
mod llvm_json;

pub use command::{LlvmCovTool, DEFAULT_LLVM_COV};
pub use llvm_json::LlvmExport;

use crate::annotate::CoverageEvent;

/// Something that knows which files were instrumented and how they ran
pub trait CoverageSource {
    /// Instrumented source files, de-duplicated and sorted
    fn files(&self) -> &[String];

    /// Events of `file` in `(line, column)` order; empty for unknown files
    fn events(&self, file: &str) -> Vec<CoverageEvent>;
}
