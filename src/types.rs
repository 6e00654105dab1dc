use std::time::Duration;

use serde::Serialize;

/// Built-in workload sizes (integration steps) used when nothing overrides them.
pub const DEFAULT_WORKLOAD_SIZES: &[u64] = &[100_000_000, 1_000_000_000, 3_000_000_000];

/// Built-in upper bound of the thread-count sweep.
pub const DEFAULT_MAX_THREADS: u32 = 50;

/// One data point: the time a single invocation reported for a thread count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    pub threads: u32,
    pub seconds: f64,
}

/// All data points recorded for one workload size, ascending by thread count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub workload: u64,
    pub points: Vec<Measurement>,
}

impl Series {
    pub fn new(workload: u64) -> Self {
        Self {
            workload,
            points: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point with the lowest elapsed time. Ties keep the lower thread count.
    pub fn best(&self) -> Option<Measurement> {
        self.points.iter().copied().fold(None, |best, m| match best {
            Some(b) if b.seconds <= m.seconds => Some(b),
            _ => Some(m),
        })
    }

    /// Single-thread time divided by the best time. `None` without a 1-thread point.
    pub fn speedup(&self) -> Option<f64> {
        let baseline = self.points.iter().find(|m| m.threads == 1)?;
        let best = self.best()?;
        if best.seconds > 0.0 {
            Some(baseline.seconds / best.seconds)
        } else {
            None
        }
    }
}

/// Measurements keyed by workload size, in the order the sizes were configured.
///
/// Every configured size has a series from the start, so a size whose
/// invocations all failed still shows up (empty) in reports and the chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    series: Vec<Series>,
}

impl ResultSet {
    pub fn new(workloads: &[u64]) -> Self {
        let mut series: Vec<Series> = Vec::with_capacity(workloads.len());
        for &w in workloads {
            if !series.iter().any(|s| s.workload == w) {
                series.push(Series::new(w));
            }
        }
        Self { series }
    }

    /// Appends a point to the workload's series.
    ///
    /// Returns `false` (and records nothing) for an unknown workload, a
    /// negative or non-finite time, or a thread count not strictly greater
    /// than the last one recorded for that workload.
    pub fn record(&mut self, workload: u64, measurement: Measurement) -> bool {
        if !measurement.seconds.is_finite() || measurement.seconds < 0.0 {
            return false;
        }
        let Some(series) = self.series.iter_mut().find(|s| s.workload == workload) else {
            return false;
        };
        if let Some(last) = series.points.last()
            && last.threads >= measurement.threads
        {
            return false;
        }
        series.points.push(measurement);
        true
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn get(&self, workload: u64) -> Option<&Series> {
        self.series.iter().find(|s| s.workload == workload)
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// Largest recorded time, used to size the chart's y axis.
    pub fn max_seconds(&self) -> Option<f64> {
        self.series
            .iter()
            .flat_map(|s| s.points.iter())
            .map(|m| m.seconds)
            .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.max(s))))
    }
}

/// Why an invocation produced no data point.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    EmptyOutput,
    Unparseable(String),
    SpawnFailed(String),
    TimedOut(Duration),
    /// The result set already holds a point for this thread count.
    AlreadyRecorded,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::EmptyOutput => write!(f, "no output"),
            SkipReason::Unparseable(token) => write!(f, "unparseable time {:?}", token),
            SkipReason::SpawnFailed(detail) => write!(f, "failed to start: {}", detail),
            SkipReason::TimedOut(limit) => write!(f, "killed after {}s", limit.as_secs_f64()),
            SkipReason::AlreadyRecorded => write!(f, "thread count already recorded"),
        }
    }
}

/// Progress notifications emitted while a sweep runs.
#[derive(Debug, Clone, PartialEq)]
pub enum SweepEvent {
    WorkloadStarted { workload: u64 },
    Recorded { workload: u64, measurement: Measurement },
    Skipped { workload: u64, threads: u32, reason: SkipReason },
}
