use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "warn";

/// Filter used when `RUST_LOG` is unset: `warn`, or more with `-v`/`-vv`.
pub fn filter_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => DEFAULT_FILTER,
        1 => "threadsweep=debug,info",
        _ => "trace",
    }
}

/// Install a stderr `tracing` subscriber. `RUST_LOG` wins over `-v` flags.
///
/// Calling this twice is harmless; the second subscriber is ignored.
pub fn init(verbose: u8) {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|expr| EnvFilter::try_new(expr).ok())
        .unwrap_or_else(|| EnvFilter::new(filter_for_verbosity(verbose)));

    let _ = fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
