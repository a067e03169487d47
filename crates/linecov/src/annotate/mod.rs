//! Coverage annotation engine
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  LINECOV ANNOTATION PIPELINE                                     │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  bytes → load_source → resolve_exclusions → annotate → report   │
//! │              ↓                 ↓                ↓                │
//! │        block markers    statement widening   fragments,          │
//! │        queued lines     (pure transform)     classification,     │
//! │                                              hit/miss lists      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each phase returns a value; nothing carries hidden state between them.

mod aggregate;
mod classifier;
mod exclusion;
mod fragment;
mod scanner;
mod source;

pub use aggregate::{compute_percentage, Aggregator, CoverageTotals, FileCoverage, PerMille};
pub use classifier::{
    abbreviate_count, classify_line, AnnotatedLine, Gutter, LineClassification, Segment,
};
pub use exclusion::resolve_exclusions;
pub use fragment::{is_trivial_code, Fragment, RenderClass};
pub use scanner::{annotate, CoverageEvent, EventScanner, FileAnnotation, SpanState};
pub use source::{
    load_source, ExclusionMarkers, MarkedSource, SourceLine, EXCLUDE_LINE, EXCLUDE_START,
    EXCLUDE_STOP,
};

/// Run all three phases over one file's raw bytes.
#[must_use]
pub fn annotate_source(
    bytes: &[u8],
    markers: &ExclusionMarkers,
    events: &[CoverageEvent],
) -> FileAnnotation {
    let lines = resolve_exclusions(load_source(bytes, markers));
    annotate(&lines, events)
}

#[cfg(test)]
mod tests;
