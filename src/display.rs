use std::path::Path;

use chrono::{DateTime, Utc};
use owo_colors::{OwoColorize, Stream, Style};
use serde::Serialize;

use crate::compile::BuildSpec;
use crate::types::{Measurement, ResultSet, SweepEvent};

// Style constants
fn style_heading() -> Style {
    Style::new().cyan().bold()
}

fn style_dim() -> Style {
    Style::new().dimmed()
}

/// Format seconds with four decimals, e.g. `1.2346s`.
pub fn format_seconds(seconds: f64) -> String {
    format!("{:.4}s", seconds)
}

/// Line announcing the compiler invocation.
pub fn format_build_start(spec: &BuildSpec) -> String {
    let label = "Compiling:"
        .if_supports_color(Stream::Stdout, |s| s.style(style_heading()))
        .to_string();
    format!("{} {}\n", label, spec.command_line())
}

/// Progress line for a sweep event, or `None` for events that print nothing.
///
/// Dropped points print nothing here. They are reported through `tracing`.
pub fn format_event(event: &SweepEvent) -> Option<String> {
    match event {
        SweepEvent::WorkloadStarted { workload } => {
            let line = format!("Testing {} steps...", workload);
            Some(format!(
                "{}\n",
                line.if_supports_color(Stream::Stdout, |s| s.style(style_heading()))
            ))
        }
        SweepEvent::Recorded { measurement, .. } => {
            let time = format_seconds(measurement.seconds);
            Some(format!(
                "  threads: {:>3}, time: {}\n",
                measurement.threads,
                time.if_supports_color(Stream::Stdout, |s| s.yellow())
            ))
        }
        SweepEvent::Skipped { .. } => None,
    }
}

/// Summary table: best time, the thread count that achieved it, speedup
/// over one thread, and how many of the sweep's points were recorded.
pub fn format_summary(results: &ResultSet, max_threads: u32) -> String {
    let mut out = String::new();

    out.push('\n');
    out.push_str(
        &"Summary:"
            .if_supports_color(Stream::Stdout, |s| s.style(style_heading()))
            .to_string(),
    );
    out.push('\n');

    let workload_width = results
        .series()
        .iter()
        .map(|s| s.workload.to_string().len())
        .max()
        .unwrap_or(0);

    for series in results.series() {
        let workload = format!("{:>width$}", series.workload, width = workload_width);
        let points = format!("{}/{} points", series.points.len(), max_threads);

        let body = match series.best() {
            Some(best) => {
                let speedup = series
                    .speedup()
                    .map_or_else(|| "-".to_string(), |s| format!("{:.2}x", s));
                format!(
                    "best {} @ {:>3} threads   speedup {:>7}   ",
                    format_seconds(best.seconds)
                        .if_supports_color(Stream::Stdout, |s| s.green()),
                    best.threads,
                    speedup,
                )
            }
            None => format!(
                "{}   ",
                "no data".if_supports_color(Stream::Stdout, |s| s.style(style_dim()))
            ),
        };

        out.push_str(&format!(
            "  {}  {}{}\n",
            workload,
            body,
            points.if_supports_color(Stream::Stdout, |s| s.style(style_dim()))
        ));
    }

    out
}

/// Closing line naming the written chart.
pub fn format_chart_saved(path: &Path) -> String {
    format!(
        "Chart saved to {}\n",
        path.display()
            .if_supports_color(Stream::Stdout, |s| s.green())
    )
}

#[derive(Serialize)]
struct JsonReport {
    started_at: String,
    max_threads: u32,
    series: Vec<JsonSeries>,
}

#[derive(Serialize)]
struct JsonSeries {
    workload: u64,
    points: Vec<Measurement>,
    best: Option<Measurement>,
    speedup: Option<f64>,
}

/// Whole result set as pretty-printed JSON, one entry per workload.
pub fn format_json(results: &ResultSet, max_threads: u32, started_at: DateTime<Utc>) -> String {
    let report = JsonReport {
        started_at: started_at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        max_threads,
        series: results
            .series()
            .iter()
            .map(|s| JsonSeries {
                workload: s.workload,
                points: s.points.clone(),
                best: s.best(),
                speedup: s.speedup(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
}
