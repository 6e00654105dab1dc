//! Reference workload: midpoint-rule integration of `4 / (1 + x²)` over
//! `[0, 1]`, which converges to π. Used by the `pi-workload` binary.

use std::thread;

fn integrand(x: f64) -> f64 {
    4.0 / (1.0 + x * x)
}

/// Half-open step range `[start, end)` handled by `worker` out of `threads`.
///
/// Steps are split into equal contiguous blocks. The last worker also
/// takes the remainder.
pub fn block_range(steps: u64, threads: u32, worker: u32) -> (u64, u64) {
    let threads = u64::from(threads.max(1));
    let worker = u64::from(worker);
    let block = steps / threads;
    let start = block * worker;
    let end = if worker + 1 == threads {
        steps
    } else {
        block * (worker + 1)
    };
    (start, end)
}

fn partial_sum(step: f64, start: u64, end: u64) -> f64 {
    (start..end)
        .map(|i| integrand((i as f64 + 0.5) * step))
        .sum()
}

/// Approximate π with `steps` midpoint samples spread over `threads` threads.
///
/// A thread count of zero is treated as one. `steps` must be non-zero.
pub fn integrate_pi(steps: u64, threads: u32) -> f64 {
    let threads = threads.max(1);
    let step = 1.0 / steps as f64;

    let total: f64 = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|worker| {
                let (start, end) = block_range(steps, threads, worker);
                s.spawn(move || partial_sum(step, start, end))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or(f64::NAN))
            .sum()
    });

    total * step
}
