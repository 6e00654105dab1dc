use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::parse;
use crate::types::{Measurement, ResultSet, SkipReason, SweepEvent};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The parameter grid of a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPlan {
    pub workloads: Vec<u64>,
    pub max_threads: u32,
    /// Per-invocation limit. `None` waits for the child however long it takes.
    pub timeout: Option<Duration>,
}

impl SweepPlan {
    pub fn invocation_count(&self) -> usize {
        self.workloads.len() * self.max_threads as usize
    }
}

/// Run `executable` once per (workload, thread count) pair and collect the timings.
///
/// Invocations run one at a time in plan order: workloads as listed, thread
/// counts ascending from 1 to `max_threads`. A point whose invocation fails
/// for any reason is dropped and reported through `on_event` as
/// `SweepEvent::Skipped`. The sweep itself never fails.
pub fn run_sweep<F>(executable: &Path, plan: &SweepPlan, mut on_event: F) -> ResultSet
where
    F: FnMut(&SweepEvent),
{
    let mut results = ResultSet::new(&plan.workloads);

    for &workload in &plan.workloads {
        on_event(&SweepEvent::WorkloadStarted { workload });

        for threads in 1..=plan.max_threads {
            let outcome = measure(executable, workload, threads, plan.timeout).and_then(|measurement| {
                if results.record(workload, measurement) {
                    Ok(measurement)
                } else {
                    Err(SkipReason::AlreadyRecorded)
                }
            });
            let event = match outcome {
                Ok(measurement) => SweepEvent::Recorded {
                    workload,
                    measurement,
                },
                Err(reason) => {
                    tracing::warn!(workload, threads, %reason, "dropping data point");
                    SweepEvent::Skipped {
                        workload,
                        threads,
                        reason,
                    }
                }
            };
            on_event(&event);
        }
    }

    results
}

/// Invoke the executable once and parse the time it reports.
///
/// The exit status is not inspected. A program that fails after printing a
/// time still yields a data point.
pub fn measure(
    executable: &Path,
    workload: u64,
    threads: u32,
    timeout: Option<Duration>,
) -> Result<Measurement, SkipReason> {
    tracing::debug!(executable = %executable.display(), workload, threads, "invoking");

    let mut cmd = Command::new(executable);
    cmd.arg(workload.to_string())
        .arg(threads.to_string())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());

    let stdout = match timeout {
        None => {
            let output = cmd
                .output()
                .map_err(|e| SkipReason::SpawnFailed(e.to_string()))?;
            String::from_utf8_lossy(&output.stdout).into_owned()
        }
        Some(limit) => output_with_timeout(cmd, limit)?,
    };

    let report = parse::parse_report(&stdout)?;
    Ok(Measurement {
        threads,
        seconds: report.seconds,
    })
}

/// Spawn `cmd`, drain its stdout on a helper thread and kill it at the deadline.
///
/// The deadline also bounds the wait for stdout to close, which a background
/// process started by the child can hold open after the child itself exits.
fn output_with_timeout(mut cmd: Command, limit: Duration) -> Result<String, SkipReason> {
    let mut child = cmd
        .spawn()
        .map_err(|e| SkipReason::SpawnFailed(e.to_string()))?;

    let mut pipe = child
        .stdout
        .take()
        .ok_or_else(|| SkipReason::SpawnFailed("stdout was not captured".to_string()))?;
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send(buf);
    });

    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(_)) => break,
            Ok(None) => {
                let elapsed = start.elapsed();
                if elapsed >= limit {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(SkipReason::TimedOut(limit));
                }
                thread::sleep(POLL_INTERVAL.min(limit - elapsed));
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(SkipReason::SpawnFailed(e.to_string()));
            }
        }
    }

    let remaining = limit.saturating_sub(start.elapsed());
    match rx.recv_timeout(remaining) {
        Ok(buf) => Ok(String::from_utf8_lossy(&buf).into_owned()),
        Err(mpsc::RecvTimeoutError::Timeout) => Err(SkipReason::TimedOut(limit)),
        Err(mpsc::RecvTimeoutError::Disconnected) => Ok(String::new()),
    }
}
