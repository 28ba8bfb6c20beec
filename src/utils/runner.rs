//! The driver loop.
//!
//! Benchmarks run strictly one at a time: one benchmark, one core count,
//! one launch. After each benchmark its CSV is written and, in grouped mode,
//! `all_results.csv` is rewritten in full.

use crate::config::DriverConfig;
use crate::error::{DriverError, Result};
use crate::locate::{locate_executable, program_name};
use crate::registry::BenchmarkSpec;
use crate::utils::cpu_affinity;
use crate::utils::process::{LaunchCommand, Launcher};
use crate::utils::report::{self, GroupedResults, ResultRow};
use crate::utils::stats::{compute_stats, Summary};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Why a benchmark produced no CSV
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// No executable in any search directory
    NotFound { program: String },
    /// Nothing parseable at this core count
    NoSamples { cores: usize },
}

/// What happened to one benchmark
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Completed(ResultRow),
    Skipped(SkipReason),
}

/// Files touched by a whole run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    /// Per-benchmark CSVs, in run order
    pub written: Vec<PathBuf>,
    /// Names of skipped benchmarks
    pub skipped: Vec<String>,
    pub backup: Option<PathBuf>,
    pub all_results: Option<PathBuf>,
}

/// Seconds since the Unix epoch, for backup directory names
pub fn unix_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Core counts a benchmark is run at: just `1` for single-core benchmarks
pub fn core_counts_for(spec: &BenchmarkSpec, configured: &[usize]) -> Vec<usize> {
    if spec.single_core {
        vec![1]
    } else {
        configured.to_vec()
    }
}

/// Launch `spec` at one core count and summarize the timings.
///
/// A mean printed by the benchmark itself wins over collected samples.
///
/// # Returns
/// `None` when neither samples nor a reported mean were found.
pub fn measure_core_count<L: Launcher>(
    spec: &BenchmarkSpec,
    exe: &Path,
    cores: usize,
    config: &DriverConfig,
    launcher: &mut L,
) -> Result<Option<Summary>> {
    let mut samples = Vec::new();
    let mut reported_mean = None;
    let mut reported_stdev = None;

    for _ in 0..spec.launches_per_core_count() {
        let cmd = LaunchCommand::new(spec, exe, cores, config.pinning);
        info!(benchmark = %spec.name, cores, "{}", cmd.command_line);

        let output = launcher.launch(&cmd)?;
        debug!(benchmark = %spec.name, "{}", output.trim());

        let found = spec.extraction.extract(&spec.name, &output)?;
        samples.extend(found.samples);
        if found.mean.is_some() {
            reported_mean = found.mean;
        }
        if found.stdev.is_some() {
            reported_stdev = found.stdev;
        }
    }

    Ok(match reported_mean {
        Some(mean) => Some(Summary {
            mean,
            stdev: reported_stdev,
        }),
        None => compute_stats(&samples),
    })
}

/// Run one benchmark across its core counts.
///
/// A missing executable or an empty core count skips the benchmark. A
/// malformed timing value or a failed spawn is an error.
pub fn run_benchmark<L: Launcher>(
    spec: &BenchmarkSpec,
    config: &DriverConfig,
    launcher: &mut L,
) -> Result<Outcome> {
    let program = program_name(&spec.name);
    let exe = match locate_executable(&config.root, &config.search_dirs, program) {
        Ok(path) => path,
        Err(DriverError::ExecutableNotFound { program, searched }) => {
            warn!(benchmark = %spec.name, ?searched, "executable '{}' not found, skipping", program);
            return Ok(Outcome::Skipped(SkipReason::NotFound { program }));
        }
        Err(e) => return Err(e),
    };
    debug!(benchmark = %spec.name, exe = %exe.display(), "located executable");

    let mut row = ResultRow::new(&spec.name);
    for cores in core_counts_for(spec, &config.core_counts) {
        match measure_core_count(spec, &exe, cores, config, launcher)? {
            Some(summary) => row.push(cores, summary),
            None => {
                warn!(
                    benchmark = %spec.name,
                    cores,
                    runs = spec.runs,
                    "no timings parsed, skipping benchmark (was it configured to run less than once?)"
                );
                return Ok(Outcome::Skipped(SkipReason::NoSamples { cores }));
            }
        }
    }
    Ok(Outcome::Completed(row))
}

/// Run `specs` in order, writing results as each one finishes.
///
/// `on_outcome` is called after each benchmark, once its files are written.
pub fn run_all<L, F>(
    specs: &[&BenchmarkSpec],
    config: &DriverConfig,
    launcher: &mut L,
    mut on_outcome: F,
) -> Result<RunSummary>
where
    L: Launcher,
    F: FnMut(&BenchmarkSpec, &Outcome),
{
    config.validate()?;

    if let Some(online) = cpu_affinity::online_cpus() {
        if let Some(&max) = config.core_counts.iter().max() {
            if max > online {
                warn!(max, online, "sweeping more cores than are online");
            }
        }
    }

    let mut summary = RunSummary {
        backup: report::prepare_results_dir(&config.results_dir, config.grouped, unix_timestamp())?,
        ..RunSummary::default()
    };
    if let Some(backup) = &summary.backup {
        info!(backup = %backup.display(), "backed up previous results");
    }

    let mut grouped = GroupedResults::new(specs.iter().copied());

    for &spec in specs {
        let outcome = run_benchmark(spec, config, launcher)?;
        match &outcome {
            Outcome::Completed(row) => {
                let path = report::write_timing_csv(&config.results_dir, spec, row)?;
                info!(benchmark = %spec.name, path = %path.display(), "wrote results");
                summary.written.push(path);
                if config.grouped {
                    grouped.add(spec, row);
                    summary.all_results = Some(grouped.write(&config.results_dir)?);
                }
            }
            Outcome::Skipped(_) => summary.skipped.push(spec.name.clone()),
        }
        on_outcome(spec, &outcome);
    }

    Ok(summary)
}
