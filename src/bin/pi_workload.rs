use std::process;
use std::time::Instant;

use clap::Parser;

use threadsweep::workload;

/// Integrate 4/(1+x²) over [0,1] and print "<seconds> <pi>".
#[derive(Parser)]
#[command(name = "pi-workload", version)]
struct Args {
    /// Number of integration steps
    #[arg(default_value_t = 100_000_000)]
    steps: u64,

    /// Number of worker threads
    #[arg(default_value_t = 1)]
    threads: u32,
}

fn main() {
    let args = Args::parse();

    if args.steps == 0 {
        eprintln!("steps must be at least 1");
        process::exit(1);
    }

    let start = Instant::now();
    let pi = workload::integrate_pi(args.steps, args.threads);
    let elapsed = start.elapsed().as_secs_f64();

    println!("{} {:.14}", elapsed, pi);
}
