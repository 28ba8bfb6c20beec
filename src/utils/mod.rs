//! Utility modules for launching benchmarks and reporting their timings.

pub mod cpu_affinity;
pub mod process;
pub mod report;
pub mod runner;
pub mod stats;
pub mod tui;

// Re-export commonly used items
pub use process::{LaunchCommand, Launcher, ShellLauncher};
pub use report::{GroupedResults, ResultRow};
pub use runner::{run_all, run_benchmark, Outcome, RunSummary, SkipReason};
pub use stats::{calculate_std_dev, compute_stats, Summary};
