//! Linecov: line and region coverage reports from LLVM source-based coverage
//!
//! Linecov reads the segment stream of an `llvm-cov export`, walks it
//! alongside the source text and decides, line by line, what counts as
//! executable and whether it ran. The result is rendered as lcov-style
//! HTML pages plus flat hit lists.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    LINECOV Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ llvm-cov   │    │ Annotation │    │ Report     │            │
//! │   │ export     │───►│ Engine     │───►│ Writer     │            │
//! │   │ (export)   │    │ (annotate) │    │ (report)   │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use linecov::{annotate_source, CoverageEvent, ExclusionMarkers};
//!
//! let src = b"int f(){\n  return 1;\n}\n";
//! let events = [CoverageEvent::code(2, 3, 5)];
//! let result = annotate_source(src, &ExclusionMarkers::default(), &events);
//! assert_eq!(result.coverage.hits, vec![2]);
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Annotation engine: line store, exclusions, scanner, classifier, totals
#[allow(clippy::cast_possible_truncation, clippy::module_name_repetitions)]
pub mod annotate;

/// Coverage data providers
pub mod export;

/// HTML, flat list, LCOV and JSON writers
#[allow(clippy::missing_errors_doc)]
pub mod report;

mod result;

pub use annotate::{
    abbreviate_count, annotate, annotate_source, classify_line, compute_percentage,
    is_trivial_code, load_source, resolve_exclusions, Aggregator, AnnotatedLine, CoverageEvent,
    CoverageTotals, EventScanner, ExclusionMarkers, FileAnnotation, FileCoverage, Fragment,
    Gutter, LineClassification, MarkedSource, PerMille, RenderClass, Segment, SourceLine,
    SpanState, EXCLUDE_LINE, EXCLUDE_START, EXCLUDE_STOP,
};
pub use export::{CoverageSource, LlvmCovTool, LlvmExport, DEFAULT_LLVM_COV};
pub use report::{
    file_timestamp, FileReport, ReportConfig, ReportGenerator, ReportSummary, SourceOutcome,
};
pub use result::{LinecovError, LinecovResult};
