//! Run benchmarks and write their timings to CSV files.
//!
//! Usage:
//!   run-benchmarks                  # Run every configured benchmark
//!   run-benchmarks --list-targets   # List configured benchmarks
//!   run-benchmarks lcs-fj lcs-sf    # Run specific benchmarks
//!   run-benchmarks --cores 1,4      # Custom core-count sweep

use bench_sweep::config::{ConfigFile, DriverConfig, Pinning};
use bench_sweep::error::Result;
use bench_sweep::tui;
use bench_sweep::utils::ShellLauncher;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser)]
#[command(about = "Run benchmarks and output their results to a file.")]
struct Args {
    /// Which benchmarks to run (default: all)
    #[arg(value_name = "BENCH")]
    benchmarks: Vec<String>,

    /// List all available benchmarks and exit
    #[arg(short = 'l', long)]
    list_targets: bool,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma-separated core counts to sweep
    #[arg(long, value_delimiter = ',')]
    cores: Option<Vec<usize>>,

    /// Directory for the CSV results
    #[arg(long)]
    results_dir: Option<PathBuf>,

    /// Directory benchmarks run in and are searched from
    #[arg(long)]
    root: Option<PathBuf>,

    /// How benchmark processes are pinned to CPUs
    #[arg(long, value_enum)]
    pinning: Option<Pinning>,

    /// Only write per-benchmark files: no backup, no all_results.csv
    #[arg(long)]
    flat: bool,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                ),
        )
        .init();
}

fn run(args: Args) -> Result<()> {
    let file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let (mut config, registry) = file.apply(DriverConfig::default())?;

    if args.list_targets {
        tui::print_available_benchmarks(&registry);
        return Ok(());
    }

    if let Some(cores) = args.cores {
        config.core_counts = cores;
    }
    if let Some(dir) = args.results_dir {
        config.results_dir = dir;
    }
    if let Some(root) = args.root {
        config.root = root;
    }
    if let Some(pinning) = args.pinning {
        config.pinning = pinning;
    }
    if args.flat {
        config.grouped = false;
    }
    config.validate()?;

    let specs = registry.select(&args.benchmarks)?;
    let mut launcher = ShellLauncher::new(&config.root);

    tui::print_header();
    let summary = bench_sweep::run_all(&specs, &config, &mut launcher, tui::print_outcome)?;
    tui::print_run_summary(&summary);
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
