//! Exclusion Resolver
//!
//! Widens every queued single-line exclusion to the statement around it.
//! This is lexical guesswork, not parsing:
//!
//! - backward: previous lines made only of blanks and braces are excluded
//!   entirely; the first line with real content is the statement start and
//!   only its trailing braces (plus one `;`) are excluded
//! - forward: leading blanks and `}` of following lines are excluded until a
//!   line has real content

use super::source::{MarkedSource, SourceLine};
use std::ops::Range;

/// Widen queued single-line exclusions and return the final lines.
#[must_use]
pub fn resolve_exclusions(marked: MarkedSource) -> Vec<SourceLine> {
    let MarkedSource { mut lines, queued } = marked;
    for index in queued {
        extend_backward(&mut lines, index);
        extend_forward(&mut lines, index);
    }
    lines
}

fn is_blank(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r')
}

fn extend_backward(lines: &mut [SourceLine], index: usize) {
    let end = index.min(lines.len());
    for line in lines[..end].iter_mut().rev() {
        let bytes = line.bytes();
        let mut stop = bytes
            .iter()
            .rposition(|&c| !is_blank(c) && c != b'{' && c != b'}')
            .map_or(0, |pos| pos + 1);
        let found_statement = stop > 0;
        // clang attributes "= default;" to one past the statement
        if found_statement && bytes[stop - 1] == b';' {
            stop -= 1;
        }
        let len = line.len();
        if stop < len {
            mark(line, stop..len);
        }
        if found_statement {
            break;
        }
    }
}

fn extend_forward(lines: &mut [SourceLine], index: usize) {
    for line in lines.iter_mut().skip(index + 1) {
        let len = line.len();
        let stop = line
            .bytes()
            .iter()
            .position(|&c| !is_blank(c) && c != b'}')
            .unwrap_or(len);
        if stop > 0 {
            mark(line, 0..stop);
        }
        if stop < len {
            break;
        }
    }
}

/// A second range on an already excluded line coarsens to the whole line.
fn mark(line: &mut SourceLine, range: Range<usize>) {
    if line.exclusion().is_some() {
        line.exclude_all();
    } else {
        line.exclude(range);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::annotate::source::{load_source, ExclusionMarkers};

    fn resolve(src: &str) -> Vec<SourceLine> {
        resolve_exclusions(load_source(src.as_bytes(), &ExclusionMarkers::default()))
    }

    #[test]
    fn test_backward_excludes_trailing_brace_of_statement_start() {
        let lines = resolve("int f(){\n  return 1; // LCOV_EXCL_LINE\n}\n");
        assert_eq!(lines[0].exclusion(), Some(7..8));
        assert!(lines[1].is_fully_excluded());
        assert!(lines[2].is_fully_excluded());
    }

    #[test]
    fn test_backward_trims_one_semicolon() {
        let lines = resolve("A() = default;\nfoo(); // LCOV_EXCL_LINE\n");
        assert_eq!(lines[0].exclusion(), Some(13..14));
        assert_eq!(lines[0].slice(13, 14), b";");
    }

    #[test]
    fn test_backward_stops_at_content_without_marking() {
        let lines = resolve("call(a,\n  b); // LCOV_EXCL_LINE\n");
        assert!(lines[0].exclusion().is_none());
    }

    #[test]
    fn test_backward_walks_over_brace_lines() {
        let src = "void f() {\n  {\n  }\n  abort(); // LCOV_EXCL_LINE\n  }\n}\nint g;\n";
        let lines = resolve(src);
        assert_eq!(lines[0].exclusion(), Some(8..10));
        assert!(lines[1].is_fully_excluded());
        assert!(lines[2].is_fully_excluded());
        assert!(lines[3].is_fully_excluded());
        assert!(lines[4].is_fully_excluded());
        assert!(lines[5].is_fully_excluded());
        assert!(lines[6].exclusion().is_none());
    }

    #[test]
    fn test_forward_stops_at_first_content() {
        let lines = resolve("x(); // LCOV_EXCL_LINE\n  } else {\ny();\n");
        assert_eq!(lines[1].exclusion(), Some(0..4));
        assert!(lines[2].exclusion().is_none());
    }

    #[test]
    fn test_forward_does_not_treat_open_brace_as_blank() {
        let lines = resolve("x(); // LCOV_EXCL_LINE\n{\n");
        assert!(lines[1].exclusion().is_none());
    }

    #[test]
    fn test_overlapping_ranges_coarsen_to_whole_line() {
        let src = "x(); // LCOV_EXCL_LINE\n} y();\nz(); // LCOV_EXCL_LINE\n";
        let lines = resolve(src);
        assert!(lines[1].is_fully_excluded());
    }

    #[test]
    fn test_marker_on_first_and_last_line() {
        let lines = resolve("a(); // LCOV_EXCL_LINE\n");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].is_fully_excluded());
    }

    #[test]
    fn test_backward_columns_count_raw_bytes() {
        let src = b"s = \"\xe9\"; {\n  x(); // LCOV_EXCL_LINE\n";
        let lines = resolve_exclusions(load_source(src, &ExclusionMarkers::default()));
        assert_eq!(lines[0].exclusion(), Some(7..10));
        assert_eq!(lines[0].slice(7, 10), b"; {");
    }

    #[test]
    fn test_without_queue_lines_are_untouched() {
        let lines = resolve("a\n{\n}\n");
        assert!(lines.iter().all(|l| l.exclusion().is_none()));
    }
}
