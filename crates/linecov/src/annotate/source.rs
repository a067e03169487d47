//! Line Store
//!
//! Splits source text into [`SourceLine`] records and recognises the
//! exclusion markers embedded in comments:
//!
//! ```text
//! LCOV_EXCL_START ... LCOV_EXCL_STOP   every line of the block is ignored
//! foo(); // LCOV_EXCL_LINE             the enclosing statement is ignored
//! bar(); // <custom substring>         same as LCOV_EXCL_LINE
//! ```
//!
//! Single-line markers are only queued here; widening them to the whole
//! statement is the job of [`resolve_exclusions`](super::resolve_exclusions).

use std::borrow::Cow;
use std::ops::Range;

/// Marker opening an excluded block
pub const EXCLUDE_START: &str = "LCOV_EXCL_START";
/// Marker closing an excluded block
pub const EXCLUDE_STOP: &str = "LCOV_EXCL_STOP";
/// Marker excluding the statement on its line
pub const EXCLUDE_LINE: &str = "LCOV_EXCL_LINE";

/// One physical line of source text, kept as raw bytes.
///
/// LLVM columns are byte offsets into the file as compiled, so the bytes are
/// never decoded here; sources in Latin-1 or other legacy encodings keep
/// their columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    bytes: Vec<u8>,
    exclusion: Option<Range<usize>>,
}

impl SourceLine {
    /// Create a line without any exclusion
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            exclusion: None,
        }
    }

    /// Raw line bytes without the terminator
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Line text for display; invalid UTF-8 becomes U+FFFD
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Length of the line in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the line is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Excluded column range, if any
    #[must_use]
    pub fn exclusion(&self) -> Option<Range<usize>> {
        self.exclusion.clone()
    }

    /// Whether `column` (0-based byte offset) lies in the excluded range
    #[must_use]
    pub fn is_excluded_at(&self, column: usize) -> bool {
        self.exclusion
            .as_ref()
            .is_some_and(|range| range.contains(&column))
    }

    /// Whether the exclusion covers the line from its first to its last byte
    #[must_use]
    pub fn is_fully_excluded(&self) -> bool {
        self.exclusion
            .as_ref()
            .is_some_and(|range| range.start == 0 && range.end >= self.bytes.len())
    }

    /// Bytes `[from, to)` clamped to the line.
    ///
    /// Profile data and sources drift apart between builds, so positions past
    /// the end yield an empty slice instead of panicking.
    #[must_use]
    pub fn slice(&self, from: usize, to: usize) -> &[u8] {
        let len = self.bytes.len();
        let start = from.min(len);
        let end = to.min(len).max(start);
        &self.bytes[start..end]
    }

    /// Bytes from `from` to the end of the line
    #[must_use]
    pub fn tail(&self, from: usize) -> &[u8] {
        self.slice(from, usize::MAX)
    }

    /// Mark `range` as excluded; empty ranges clear nothing and add nothing
    pub(crate) fn exclude(&mut self, range: Range<usize>) {
        let end = range.end.min(self.bytes.len());
        if range.start < end {
            self.exclusion = Some(range.start..end);
        }
    }

    /// Exclude the complete line
    pub(crate) fn exclude_all(&mut self) {
        self.exclude(0..self.bytes.len());
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|window| window == needle)
}

/// Literal substrings that exclude a line, in addition to [`EXCLUDE_LINE`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionMarkers {
    extra: Vec<String>,
}

impl ExclusionMarkers {
    /// Create markers from caller-supplied substrings; empty strings are dropped
    #[must_use]
    pub fn new<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extra: extra
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        }
    }

    /// The caller-supplied substrings
    #[must_use]
    pub fn extra(&self) -> &[String] {
        &self.extra
    }

    fn matches_extra(&self, line: &[u8]) -> bool {
        self.extra.iter().any(|marker| contains(line, marker.as_bytes()))
    }
}

/// Source lines with block exclusions applied and single-line exclusions queued
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkedSource {
    /// Lines in file order
    pub lines: Vec<SourceLine>,
    /// 0-based indices of lines whose exclusion still has to be widened
    pub queued: Vec<usize>,
}

/// Split raw source bytes into lines and recognise exclusion markers.
///
/// Lines are split on `\n` only; a trailing `\r` stays part of the line so
/// that column offsets match the compiler's. An unterminated
/// [`EXCLUDE_START`] silently ignores the rest of the file.
#[must_use]
pub fn load_source(bytes: &[u8], markers: &ExclusionMarkers) -> MarkedSource {
    let mut pieces: Vec<&[u8]> = bytes.split(|&b| b == b'\n').collect();
    if bytes.is_empty() || bytes.ends_with(b"\n") {
        let _ = pieces.pop();
    }

    let mut marked = MarkedSource::default();
    let mut in_block = false;
    for piece in pieces {
        let index = marked.lines.len();
        let mut line = SourceLine::new(piece);
        let ignored = if in_block {
            if contains(piece, EXCLUDE_STOP.as_bytes()) {
                in_block = false;
            }
            true
        } else if contains(piece, EXCLUDE_START.as_bytes()) {
            in_block = true;
            true
        } else if contains(piece, EXCLUDE_LINE.as_bytes()) || markers.matches_extra(piece) {
            marked.queued.push(index);
            true
        } else {
            false
        };
        if ignored {
            line.exclude_all();
        }
        marked.lines.push(line);
    }
    marked
}
