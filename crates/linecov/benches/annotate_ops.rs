//! Annotation Benchmarks
//!
//! Benchmarks for exclusion resolution and event scanning over synthetic
//! sources of increasing size.
//!
//! Run with: `cargo bench --bench annotate_ops`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use linecov::{
    annotate, annotate_source, load_source, resolve_exclusions, CoverageEvent, ExclusionMarkers,
};

/// A source of `functions` small functions, every tenth one excluded
fn synthetic_source(functions: usize) -> String {
    let mut src = String::new();
    for i in 0..functions {
        src.push_str(&format!("int f{i}(int x) {{\n"));
        src.push_str("  if (x > 0)\n");
        if i % 10 == 0 {
            src.push_str("    abort(); // LCOV_EXCL_LINE\n");
        } else {
            src.push_str("    return x * 2;\n");
        }
        src.push_str("  return 0;\n}\n\n");
    }
    src
}

/// LLVM-shaped events for [`synthetic_source`]
fn synthetic_events(functions: usize) -> Vec<CoverageEvent> {
    let mut events = Vec::with_capacity(functions * 4);
    for i in 0..functions {
        let base = (i * 6) as u32;
        let count = (i % 7) as u64;
        events.push(CoverageEvent::code(base + 1, 14, 5).with_region_entry());
        events.push(CoverageEvent::code(base + 3, 5, count).with_region_entry());
        events.push(CoverageEvent::code(base + 3, 18, 5));
        events.push(CoverageEvent::end(base + 5, 2));
    }
    events
}

fn bench_resolve_exclusions(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_exclusions");

    for functions in [100, 1_000, 10_000] {
        let src = synthetic_source(functions);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{functions}_functions")),
            &src,
            |bench, src| {
                bench.iter(|| {
                    let marked =
                        load_source(black_box(src.as_bytes()), &ExclusionMarkers::default());
                    black_box(resolve_exclusions(marked));
                });
            },
        );
    }

    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    for functions in [100, 1_000, 10_000] {
        let src = synthetic_source(functions);
        let lines = resolve_exclusions(load_source(src.as_bytes(), &ExclusionMarkers::default()));
        let events = synthetic_events(functions);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{functions}_functions")),
            &(lines, events),
            |bench, (lines, events)| {
                bench.iter(|| black_box(annotate(black_box(lines), black_box(events))));
            },
        );
    }

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let src = synthetic_source(1_000);
    let events = synthetic_events(1_000);
    let markers = ExclusionMarkers::new(["abort()"]);

    c.bench_function("annotate_source_1000_functions", |bench| {
        bench.iter(|| black_box(annotate_source(black_box(src.as_bytes()), &markers, &events)));
    });
}

criterion_group!(
    benches,
    bench_resolve_exclusions,
    bench_scan,
    bench_full_pipeline
);
criterion_main!(benches);
