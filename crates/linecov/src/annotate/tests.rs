//! Scenario tests for the annotation engine
//!
//! Each test feeds a small source file and an LLVM-shaped event stream
//! through all three phases and checks line classification and totals.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

fn run(src: &str, events: &[CoverageEvent]) -> FileAnnotation {
    annotate_source(src.as_bytes(), &ExclusionMarkers::default(), events)
}

fn executable(result: &FileAnnotation) -> Vec<u32> {
    result
        .lines
        .iter()
        .filter(|l| l.classification.executable)
        .map(AnnotatedLine::number)
        .collect()
}

fn classes(line: &AnnotatedLine) -> Vec<RenderClass> {
    line.segments.iter().map(|s| s.class).collect()
}

// ============================================================================
// Basic scanning
// ============================================================================

mod scanning_tests {
    use super::*;

    const SIMPLE: &str = "int f(){\n  return 1;\n}\n";

    /// A single counted event makes its line executable and hit
    #[test]
    fn test_single_event_hits_its_line() {
        let result = run(SIMPLE, &[CoverageEvent::code(2, 3, 5)]);

        assert_eq!(executable(&result), vec![2]);
        let line = &result.lines[1];
        assert!(line.classification.hit);
        assert_eq!(line.classification.max_count, 5);
        assert_eq!(result.totals(), CoverageTotals::new(1, 1));
        assert_eq!(result.coverage.hits, vec![2]);
        assert!(result.coverage.misses.is_empty());
    }

    /// Every source line is annotated exactly once, in order
    #[test]
    fn test_every_line_annotated_once() {
        let result = run(SIMPLE, &[CoverageEvent::code(2, 3, 5)]);
        let numbers: Vec<u32> = result.lines.iter().map(AnnotatedLine::number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(result.lines[0].text(), "int f(){");
        assert_eq!(result.lines[1].text(), "  return 1;");
        assert_eq!(result.lines[2].text(), "}");
    }

    /// Two events on one line split it into a miss and a hit
    #[test]
    fn test_two_events_same_line() {
        let src = "  if (x) return y;\n";
        let events = [CoverageEvent::code(1, 3, 0), CoverageEvent::code(1, 10, 7)];
        let result = run(src, &events);

        let line = &result.lines[0];
        assert!(line.classification.executable);
        assert!(line.classification.hit);
        assert_eq!(
            classes(line),
            vec![RenderClass::None, RenderClass::Miss, RenderClass::Partial]
        );
        assert_eq!(line.segments[1].text, "if (x) ");
        assert_eq!(line.segments[2].text, "return y;");
    }

    /// A typical LLVM stream with a never-taken branch
    #[test]
    fn test_function_with_untaken_branch() {
        let src = "int f(int x) {\n  if (x)\n    return 1;\n  return 0;\n}\n";
        let events = [
            CoverageEvent::code(1, 14, 3).with_region_entry(),
            CoverageEvent::code(3, 5, 0).with_region_entry(),
            CoverageEvent::code(3, 14, 3),
            CoverageEvent::end(5, 2),
        ];
        let result = run(src, &events);

        assert_eq!(executable(&result), vec![2, 3, 4]);
        assert_eq!(result.coverage.hits, vec![2, 4]);
        assert_eq!(result.coverage.misses, vec![3]);
        assert_eq!(result.totals(), CoverageTotals::new(2, 3));
        assert_eq!(
            result.lines[2].classification.gutter(),
            Gutter::Uncovered { hit: 0, total: 1 }
        );
        assert_eq!(result.lines[3].classification.gutter(), Gutter::Count(3));
    }

    /// Lines before the first and after the last event are prose
    #[test]
    fn test_untouched_lines_not_executable() {
        let src = "// header\nint x = f();\n// footer\n\n";
        let events = [CoverageEvent::code(2, 9, 1), CoverageEvent::end(2, 12)];
        let result = run(src, &events);
        assert_eq!(executable(&result), vec![2]);
        assert!(!result.lines[0].classification.executable);
        assert!(!result.lines[2].classification.executable);
        assert!(!result.lines[3].classification.executable);
    }

    /// Without any events nothing is executable
    #[test]
    fn test_no_events() {
        let result = run("a();\nb();\n", &[]);
        assert_eq!(result.lines.len(), 2);
        assert!(executable(&result).is_empty());
        assert_eq!(result.totals(), CoverageTotals::default());
    }

    /// Gap regions never count as code, whatever their count
    #[test]
    fn test_gap_region_is_not_code() {
        let src = "  x = 1;\n";
        let events = [
            CoverageEvent::code(1, 3, 5).with_gap(),
            CoverageEvent::end(1, 9),
        ];
        let result = run(src, &events);
        assert!(executable(&result).is_empty());
    }

    /// A region spanning lines marks the lines in between with its count
    #[test]
    fn test_multi_line_region_covers_intermediate_lines() {
        let src = "{\n  a();\n  b();\n}\n";
        let events = [CoverageEvent::code(1, 1, 2), CoverageEvent::end(4, 2)];
        let result = run(src, &events);
        assert_eq!(executable(&result), vec![2, 3]);
        assert_eq!(result.totals(), CoverageTotals::new(2, 2));
    }

    /// The region-entry flag decides between partial and uncovered gutters
    #[test]
    fn test_region_entry_gutter() {
        let src = "a(); b();\n";
        let with_entry = [
            CoverageEvent::code(1, 1, 0),
            CoverageEvent::code(1, 6, 2).with_region_entry(),
            CoverageEvent::end(1, 10),
        ];
        let result = run(src, &with_entry);
        assert_eq!(
            result.lines[0].classification.gutter(),
            Gutter::Partial { hit: 1, total: 2 }
        );

        let without_entry = [
            CoverageEvent::code(1, 1, 0),
            CoverageEvent::code(1, 6, 2),
            CoverageEvent::end(1, 10),
        ];
        let result = run(src, &without_entry);
        assert_eq!(
            result.lines[0].classification.gutter(),
            Gutter::Uncovered { hit: 1, total: 2 }
        );
    }

    /// Region entries only apply on the line the region starts on
    #[test]
    fn test_region_entry_does_not_leak_to_later_lines() {
        let src = "x(\n  y);\n";
        let events = [
            CoverageEvent::code(1, 1, 4).with_region_entry(),
            CoverageEvent::end(2, 6),
        ];
        let result = run(src, &events);
        assert!(result.lines[0].classification.has_partial_region_entry);
        assert!(!result.lines[1].classification.has_partial_region_entry);
    }

    /// Re-running on identical input gives identical output
    #[test]
    fn test_idempotent() {
        let src = "int f(int x) {\n  if (x)\n    return 1;\n  return 0;\n}\n";
        let events = [
            CoverageEvent::code(1, 14, 3).with_region_entry(),
            CoverageEvent::code(3, 5, 0).with_region_entry(),
            CoverageEvent::code(3, 14, 3),
            CoverageEvent::end(5, 2),
        ];
        assert_eq!(run(src, &events), run(src, &events));
    }
}

// ============================================================================
// Exclusions during scanning
// ============================================================================

mod exclusion_scan_tests {
    use super::*;

    /// A marker silences the statement and the braces around it
    #[test]
    fn test_excluded_statement_contributes_nothing() {
        let src = "int f(){\n  return 1; // LCOV_EXCL_LINE\n}\n";
        let result = run(src, &[CoverageEvent::code(2, 3, 5)]);
        assert!(executable(&result).is_empty());
        assert_eq!(result.totals(), CoverageTotals::new(0, 0));
    }

    /// A never-run body hidden by a marker is not reported as a miss
    #[test]
    fn test_excluded_dead_code_is_not_a_miss() {
        let events = [
            CoverageEvent::code(1, 10, 0).with_region_entry(),
            CoverageEvent::end(3, 2),
        ];
        let plain = run("void g() {\n  work();\n}\n", &events);
        assert_eq!(plain.totals(), CoverageTotals::new(0, 1));

        let excluded = run("void g() {\n  work(); // LCOV_EXCL_LINE\n}\n", &events);
        assert_eq!(excluded.totals(), CoverageTotals::new(0, 0));
    }

    /// Excluded code still counts when it actually ran
    #[test]
    fn test_excluded_code_counts_when_hit() {
        let src = "x();\ny(); // LCOV_EXCL_LINE\nz();\n";
        let hit = run(src, &[CoverageEvent::code(1, 1, 4), CoverageEvent::end(3, 1)]);
        assert_eq!(hit.coverage.hits, vec![1, 2]);

        let missed = run(src, &[CoverageEvent::code(1, 1, 0), CoverageEvent::end(3, 1)]);
        assert_eq!(missed.coverage.misses, vec![1]);
        assert!(missed.coverage.hits.is_empty());
    }

    /// Block exclusions hide never-run code in between
    #[test]
    fn test_block_exclusion() {
        let src = "{\n// LCOV_EXCL_START\n  a();\n  b();\n// LCOV_EXCL_STOP\n  c();\n}\n";
        let events = [CoverageEvent::code(1, 1, 0), CoverageEvent::end(7, 2)];
        let result = run(src, &events);
        assert_eq!(result.coverage.misses, vec![6]);
    }

    /// Caller-supplied markers behave like LCOV_EXCL_LINE
    #[test]
    fn test_custom_marker() {
        let src = "{\n  a();\n  panic!(\"no\");\n}\n";
        let events = [CoverageEvent::code(1, 1, 0), CoverageEvent::end(4, 2)];
        let markers = ExclusionMarkers::new(["panic!"]);
        let result = annotate_source(src.as_bytes(), &markers, &events);
        assert_eq!(result.coverage.misses, vec![2]);
    }

    /// A partially excluded skipped line keeps its unexcluded code
    #[test]
    fn test_partial_exclusion_on_skipped_line() {
        let src = "{\n  a();\n  } b();\n}\n";
        let mut lines = load_source(src.as_bytes(), &ExclusionMarkers::default()).lines;
        lines[2].exclude(0..3);
        let events = [CoverageEvent::code(1, 1, 0), CoverageEvent::end(4, 2)];
        let result = annotate(&lines, &events);
        assert_eq!(result.coverage.misses, vec![2, 3]);
        assert_eq!(result.lines[2].segments[0].class, RenderClass::None);
        assert_eq!(result.lines[2].segments[1].text, " b();");
        assert_eq!(result.lines[2].segments[1].class, RenderClass::Miss);
    }
}

// ============================================================================
// Data skew between profile and source
// ============================================================================

mod skew_tests {
    use super::*;

    /// Events past the last line are clamped, every line finishes once
    #[test]
    fn test_events_past_end_of_file() {
        let events = [
            CoverageEvent::code(1, 1, 1),
            CoverageEvent::code(5, 1, 0),
            CoverageEvent::code(9, 3, 2),
        ];
        let result = run("a\nb\n", &events);
        assert_eq!(result.lines.len(), 2);
        assert_eq!(result.totals(), CoverageTotals::new(2, 2));
    }

    /// Columns past the end of a line are clamped
    #[test]
    fn test_column_past_end_of_line() {
        let events = [CoverageEvent::code(1, 1, 1), CoverageEvent::end(1, 50)];
        let result = run("ab\n", &events);
        assert_eq!(result.lines[0].text(), "ab");
        assert!(result.lines[0].classification.hit);
    }

    /// Events against an empty source produce an empty annotation
    #[test]
    fn test_empty_source() {
        let result = run("", &[CoverageEvent::code(1, 1, 1)]);
        assert!(result.lines.is_empty());
        assert_eq!(result.totals(), CoverageTotals::default());
    }

    /// A column inside a multi-byte character splits its bytes
    #[test]
    fn test_column_inside_multibyte_char() {
        let events = [CoverageEvent::code(1, 1, 0), CoverageEvent::code(1, 2, 1)];
        let result = run("é = 1;\n", &events);
        assert_eq!(classes(&result.lines[0]), vec![RenderClass::Miss, RenderClass::Partial]);
        assert_eq!(result.lines[0].text(), "\u{fffd}\u{fffd} = 1;");
    }

    /// A Latin-1 byte before an event does not shift its column
    #[test]
    fn test_invalid_utf8_before_event_column() {
        let src = b"s=\"\xff\";}\n";
        let events = [CoverageEvent::code(1, 7, 0), CoverageEvent::end(1, 8)];
        let result = annotate_source(src, &ExclusionMarkers::default(), &events);

        assert_eq!(result.totals(), CoverageTotals::default());
        assert_eq!(classes(&result.lines[0]), vec![RenderClass::None]);
        assert_eq!(result.lines[0].text(), "s=\"\u{fffd}\";}");
    }

    /// Code after a Latin-1 comment is sliced at the right byte
    #[test]
    fn test_code_after_invalid_utf8_comment() {
        let src = b"/* \xe9 */ x();\n";
        let events = [CoverageEvent::code(1, 9, 2), CoverageEvent::end(1, 13)];
        let result = annotate_source(src, &ExclusionMarkers::default(), &events);

        let line = &result.lines[0];
        assert_eq!(classes(line), vec![RenderClass::None, RenderClass::Full, RenderClass::None]);
        assert_eq!(line.segments[0].text, "/* \u{fffd} */ ");
        assert_eq!(line.segments[1].text, "x();");
        assert_eq!(result.totals(), CoverageTotals::new(1, 1));
    }

    /// Out-of-order events are dropped instead of rewinding
    #[test]
    fn test_out_of_order_event_ignored() {
        let events = [
            CoverageEvent::code(2, 1, 1),
            CoverageEvent::code(1, 1, 0),
            CoverageEvent::end(2, 5),
        ];
        let result = run("a;\nb();\n", &events);
        assert_eq!(result.lines.len(), 2);
        assert_eq!(result.lines[1].text(), "b();");
        assert!(!result.lines[0].classification.executable);
    }
}

// ============================================================================
// Aggregation over files
// ============================================================================

mod aggregation_tests {
    use super::*;

    #[test]
    fn test_files_fold_into_aggregator() {
        let events = [
            CoverageEvent::code(1, 14, 3).with_region_entry(),
            CoverageEvent::code(3, 5, 0).with_region_entry(),
            CoverageEvent::code(3, 14, 3),
            CoverageEvent::end(5, 2),
        ];
        let src = "int f(int x) {\n  if (x)\n    return 1;\n  return 0;\n}\n";

        let mut agg = Aggregator::new();
        agg.add_file("b.c", run(src, &events).coverage);
        agg.add_file("a.c", run(src, &events).coverage);

        assert_eq!(agg.totals(), CoverageTotals::new(4, 6));
        assert_eq!(agg.totals().percentage().to_string(), "66.6");
        assert_eq!(agg.file("a.c").unwrap().misses, vec![3]);
    }
}
