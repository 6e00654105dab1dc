use chrono::{DateTime, Utc};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use threadsweep::display;
use threadsweep::parse;
use threadsweep::render::{self, ChartSpec};
use threadsweep::types::{Measurement, ResultSet};
use threadsweep::workload;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Result set shaped like a full default sweep: `workloads` sizes, each with
/// a point for every thread count and a time that falls off with threads.
fn make_results(workloads: usize, max_threads: u32) -> ResultSet {
    let sizes: Vec<u64> = (0..workloads as u64).map(|i| 100_000_000 * (i + 1)).collect();
    let mut results = ResultSet::new(&sizes);
    for (i, &size) in sizes.iter().enumerate() {
        let base = 0.8 * (i + 1) as f64;
        for threads in 1..=max_threads {
            let seconds = base / f64::from(threads.min(8)) + 0.001 * f64::from(threads);
            results.record(size, Measurement { threads, seconds });
        }
    }
    results
}

// ---------------------------------------------------------------------------
// Benchmarks: parse
// ---------------------------------------------------------------------------

fn bench_parse(c: &mut Criterion) {
    let inputs = [
        ("time_only", "0.8123\n"),
        ("time_and_pi", "0.812345 3.14159265358979\n"),
        ("padded", "\n\n   1.5    trailing words that are ignored\n"),
        ("empty", ""),
        ("garbage", "Segmentation fault (core dumped)\n"),
    ];

    let mut group = c.benchmark_group("parse_report");
    for (name, input) in &inputs {
        group.bench_with_input(BenchmarkId::new("input", name), input, |b, s| {
            b.iter(|| parse::parse_report(s));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmarks: result set
// ---------------------------------------------------------------------------

fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("result_set");
    for &max_threads in &[8u32, 50, 256] {
        group.bench_with_input(
            BenchmarkId::new("fill", max_threads),
            &max_threads,
            |b, &t| b.iter(|| make_results(3, t)),
        );
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmarks: display
// ---------------------------------------------------------------------------

fn bench_display(c: &mut Criterion) {
    let now: DateTime<Utc> = DateTime::parse_from_rfc3339("2026-02-18T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    let results = make_results(3, 50);

    let mut group = c.benchmark_group("display");
    group.bench_function("format_summary_3x50", |b| {
        b.iter(|| display::format_summary(&results, 50));
    });
    group.bench_function("format_json_3x50", |b| {
        b.iter(|| display::format_json(&results, 50, now));
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmarks: render
// ---------------------------------------------------------------------------

fn bench_render(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let results = make_results(3, 50);

    let spec = ChartSpec {
        path: dir.path().join("chart.svg"),
        ..ChartSpec::default()
    };

    c.bench_function("render_svg_3x50", |b| {
        b.iter(|| render::render_chart(&results, 50, &spec).unwrap());
    });
}

// ---------------------------------------------------------------------------
// Benchmarks: reference workload
// ---------------------------------------------------------------------------

fn bench_integrate_pi(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrate_pi_1m");
    for &threads in &[1u32, 2, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &t| {
            b.iter(|| workload::integrate_pi(1_000_000, t));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Criterion groups
// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    bench_parse,
    bench_record,
    bench_display,
    bench_render,
    bench_integrate_pi,
);
criterion_main!(benches);
