//! Event Scanner
//!
//! Walks the ordered coverage events and the source lines in lockstep.
//! An event describes the span *preceding* it: when the cursor moves to
//! `(line, column)` every byte passed over is tagged with the state of the
//! previous event.
//!
//! ```text
//!  event A (count 0)        event B (count 7)
//!        v                        v
//!   if (x)  return y;             ...
//!   [none][ tagged with A ][ tagged with B ...
//! ```
//!
//! Excluded text is only counted as code if it actually ran, so code a
//! directive hides never shows up as a miss.

use super::aggregate::{CoverageTotals, FileCoverage};
use super::classifier::{classify_line, AnnotatedLine};
use super::fragment::Fragment;
use super::source::SourceLine;
use tracing::{debug, warn};

/// One coverage segment boundary, as reported by LLVM
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageEvent {
    /// 1-based line
    pub line: u32,
    /// 1-based column (byte offset + 1)
    pub column: u32,
    /// Execution count of the span starting here
    pub count: u64,
    /// Whether the span starting here has a count at all
    pub has_code: bool,
    /// Whether a region starts here
    pub is_region_entry: bool,
    /// Whether the span starting here is a gap region
    pub is_gap_region: bool,
}

impl CoverageEvent {
    /// An event with a count on code
    #[must_use]
    pub const fn code(line: u32, column: u32, count: u64) -> Self {
        Self {
            line,
            column,
            count,
            has_code: true,
            is_region_entry: false,
            is_gap_region: false,
        }
    }

    /// An event closing the previous span
    #[must_use]
    pub const fn end(line: u32, column: u32) -> Self {
        Self {
            line,
            column,
            count: 0,
            has_code: false,
            is_region_entry: false,
            is_gap_region: false,
        }
    }

    /// Mark the event as a region entry
    #[must_use]
    pub const fn with_region_entry(mut self) -> Self {
        self.is_region_entry = true;
        self
    }

    /// Mark the event as a gap region
    #[must_use]
    pub const fn with_gap(mut self) -> Self {
        self.is_gap_region = true;
        self
    }
}

/// Coverage state of the span between two events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpanState {
    /// Execution count
    pub count: u64,
    /// Whether the span is counted code
    pub has_code: bool,
    /// Line of the event that opened the region, if it was a region entry
    pub region_entry_line: Option<u32>,
}

impl SpanState {
    /// State of the span that starts at `event`
    #[must_use]
    pub const fn after(event: &CoverageEvent) -> Self {
        Self {
            count: event.count,
            has_code: event.has_code && !event.is_gap_region,
            region_entry_line: if event.is_region_entry {
                Some(event.line)
            } else {
                None
            },
        }
    }

    fn enters_on(&self, line_number: usize) -> bool {
        self.region_entry_line
            .is_some_and(|line| line as usize == line_number)
    }

    /// Code flag for text that is (or is not) excluded
    fn code_for(&self, excluded: bool) -> bool {
        self.has_code && (self.count > 0 || !excluded)
    }
}

/// Result of annotating one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileAnnotation {
    /// Every source line, in order
    pub lines: Vec<AnnotatedLine>,
    /// Hit and miss lists of the file
    pub coverage: FileCoverage,
}

impl FileAnnotation {
    /// Hit and executable line counts
    #[must_use]
    pub const fn totals(&self) -> CoverageTotals {
        self.coverage.totals
    }
}

/// Cursor over one file's lines, fed with events in `(line, column)` order
#[derive(Debug)]
pub struct EventScanner<'a> {
    lines: &'a [SourceLine],
    /// 1-based current line, 0 before the first event
    line_no: usize,
    /// 0-based byte offset within the current line
    column: usize,
    fragments: Vec<Fragment>,
    annotated: Vec<AnnotatedLine>,
    coverage: FileCoverage,
    exhausted: bool,
}

impl<'a> EventScanner<'a> {
    /// Create a scanner positioned before the first line
    #[must_use]
    pub fn new(lines: &'a [SourceLine]) -> Self {
        Self {
            lines,
            line_no: 0,
            column: 0,
            fragments: Vec::new(),
            annotated: Vec::with_capacity(lines.len()),
            coverage: FileCoverage::default(),
            exhausted: false,
        }
    }

    /// Advance to `(target_line, column)`, tagging the text passed over with
    /// `state`, the state of the previous event.
    pub fn skip_to(&mut self, target_line: u32, column: u32, state: SpanState) {
        if self.exhausted {
            return;
        }
        let target = target_line as usize;
        if target < self.line_no {
            debug!(target_line, current = self.line_no, "ignoring out-of-order event");
            return;
        }

        if target > self.line_no {
            if self.line_no > 0 {
                let lines = self.lines;
                let len = lines[self.line_no - 1].len();
                if self.column < len {
                    self.push_span(self.column, len, state);
                }
                self.finish_line();
            }
            while self.line_no < target {
                if self.line_no >= self.lines.len() {
                    break;
                }
                self.line_no += 1;
                self.column = 0;
                if self.line_no < target {
                    self.push_skipped_line(state);
                    self.finish_line();
                }
            }
            if target > self.lines.len() {
                warn!(
                    target_line,
                    lines = self.lines.len(),
                    "coverage data points past the end of the source"
                );
                self.exhausted = true;
                return;
            }
        }

        let col = (column as usize).saturating_sub(1);
        if self.line_no > 0 && col > self.column {
            self.push_span(self.column, col, state);
            self.column = col;
        }
    }

    /// Emit the rest of the file and return the annotation.
    ///
    /// The tail of the last touched line carries `state` (excluded text in it
    /// is not code); lines after it are prose and never executable.
    #[must_use]
    pub fn flush(mut self, state: SpanState) -> FileAnnotation {
        if !self.exhausted {
            if self.line_no > 0 {
                let lines = self.lines;
                let line = &lines[self.line_no - 1];
                let has_code = state.has_code && !line.is_excluded_at(self.column);
                let fragment = Fragment::new(
                    line.tail(self.column),
                    state.count,
                    has_code,
                    state.enters_on(self.line_no),
                );
                self.fragments.push(fragment);
                self.finish_line();
            }
            while self.line_no < self.lines.len() {
                self.line_no += 1;
                let text = self.lines[self.line_no - 1].bytes();
                self.fragments.push(Fragment::new(text, 0, false, false));
                self.finish_line();
            }
        }
        FileAnnotation {
            lines: self.annotated,
            coverage: self.coverage,
        }
    }

    /// Emit `[from, to)` of the current line; exclusion is judged at `from`
    fn push_span(&mut self, from: usize, to: usize, state: SpanState) {
        let lines = self.lines;
        let line = &lines[self.line_no - 1];
        let has_code = state.code_for(line.is_excluded_at(from));
        let fragment = Fragment::new(
            line.slice(from, to),
            state.count,
            has_code,
            state.enters_on(self.line_no),
        );
        self.fragments.push(fragment);
    }

    /// Emit a line no event lands on, honouring a partial exclusion
    fn push_skipped_line(&mut self, state: SpanState) {
        let lines = self.lines;
        let line = &lines[self.line_no - 1];
        let entry = state.enters_on(self.line_no);
        match line.exclusion() {
            Some(range) if !line.is_fully_excluded() => {
                if range.start > 0 {
                    let text = line.slice(0, range.start);
                    self.fragments
                        .push(Fragment::new(text, state.count, state.has_code, entry));
                }
                let text = line.slice(range.start, range.end);
                self.fragments
                    .push(Fragment::new(text, state.count, state.code_for(true), entry));
                if range.end < line.len() {
                    let text = line.tail(range.end);
                    self.fragments
                        .push(Fragment::new(text, state.count, state.has_code, entry));
                }
            }
            exclusion => {
                let has_code = state.code_for(exclusion.is_some());
                self.fragments
                    .push(Fragment::new(line.bytes(), state.count, has_code, entry));
            }
        }
    }

    fn finish_line(&mut self) {
        let fragments = std::mem::take(&mut self.fragments);
        let annotated = classify_line(self.line_no as u32, &fragments);
        let stats = annotated.classification;
        if stats.executable {
            self.coverage.record_line(stats.line_number, stats.hit);
        }
        self.annotated.push(annotated);
    }
}

/// Annotate `lines` with `events`, which must be ordered by `(line, column)`.
#[must_use]
pub fn annotate(lines: &[SourceLine], events: &[CoverageEvent]) -> FileAnnotation {
    let mut scanner = EventScanner::new(lines);
    let mut state = SpanState::default();
    for event in events {
        scanner.skip_to(event.line, event.column, state);
        state = SpanState::after(event);
    }
    scanner.flush(state)
}
