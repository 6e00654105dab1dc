use std::path::PathBuf;
use std::process;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;

use threadsweep::config::{Config, Overrides};
use threadsweep::display;
use threadsweep::logging;
use threadsweep::pipeline;
use threadsweep::render;
use threadsweep::viewer;

#[derive(Parser)]
#[command(
    name = "threadsweep",
    version,
    about = "Build a multi-threaded program, sweep its thread count and chart the timings"
)]
struct Cli {
    /// Config file (default: ./threadsweep.toml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Workload sizes passed as the first argument, comma separated
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<u64>>,

    /// Highest thread count to test (sweeps 1..=N)
    #[arg(short = 't', long)]
    max_threads: Option<u32>,

    /// Compiler used for the build step
    #[arg(long)]
    compiler: Option<String>,

    /// Source file handed to the compiler
    #[arg(long)]
    source: Option<PathBuf>,

    /// Program to sweep instead of the build output
    #[arg(long)]
    executable: Option<PathBuf>,

    /// Skip the build step
    #[arg(long)]
    no_build: bool,

    /// Chart output path (.png or .svg)
    #[arg(short = 'o', long)]
    chart: Option<PathBuf>,

    /// Kill an invocation after this many seconds and drop its data point
    #[arg(long)]
    timeout: Option<f64>,

    /// Do not open the chart after writing it
    #[arg(long)]
    no_show: bool,

    /// Print results as JSON instead of progress and summary
    #[arg(long)]
    json: bool,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            workloads: self.sizes.clone(),
            max_threads: self.max_threads,
            compiler: self.compiler.clone(),
            source: self.source.clone(),
            executable: self.executable.clone(),
            no_build: self.no_build,
            chart: self.chart.clone(),
            timeout_secs: self.timeout,
            no_show: self.no_show,
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = Config::load(cli.config.as_deref(), &cli.overrides())?;
    let started_at = Utc::now();

    let results = if cli.json {
        pipeline::execute(&config, |_| {})?
    } else {
        pipeline::execute(&config, |line| print!("{}", line))?
    };

    if cli.json {
        println!("{}", display::format_json(&results, config.plan.max_threads, started_at));
    } else {
        print!("{}", display::format_summary(&results, config.plan.max_threads));
    }

    render::render_chart(&results, config.plan.max_threads, &config.chart)?;
    if !cli.json {
        print!("{}", display::format_chart_saved(&config.chart.path));
    }

    if config.show_chart
        && let Err(err) = viewer::show_chart(&config.chart.path)
    {
        tracing::warn!("could not display chart: {:#}", err);
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}
