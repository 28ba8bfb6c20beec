//! Driver configuration.
//!
//! Defaults come from [`DriverConfig::default`], an optional JSON file is
//! layered on top, and command-line flags are applied last by the binary.

use crate::error::{DriverError, Result};
use crate::registry::{build_registry, BenchmarkEntry, BenchmarkRegistry};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Directories searched for benchmark executables, relative to the root
pub const DEFAULT_SEARCH_DIRS: [&str; 3] = ["ferret", "future-bench", "futurerd-bench"];

/// How benchmark processes are confined to their CPUs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Pinning {
    /// Prefix the command with `taskset -c 0-(P-1)`
    #[default]
    Taskset,
    /// Set the child's affinity mask directly
    Native,
    /// Run unpinned
    None,
}

/// Settings for one driver run
#[derive(Clone, Debug, PartialEq)]
pub struct DriverConfig {
    /// Core counts to sweep
    pub core_counts: Vec<usize>,
    /// Where per-benchmark CSVs and `all_results.csv` go
    pub results_dir: PathBuf,
    /// Working directory for benchmarks and base of `search_dirs`
    pub root: PathBuf,
    pub search_dirs: Vec<PathBuf>,
    pub pinning: Pinning,
    /// Back up and clear the results directory, and maintain `all_results.csv`
    pub grouped: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            core_counts: vec![1, 2, 4, 8, 16],
            results_dir: PathBuf::from("bench-results"),
            root: PathBuf::from("."),
            search_dirs: DEFAULT_SEARCH_DIRS.iter().map(PathBuf::from).collect(),
            pinning: Pinning::default(),
            grouped: true,
        }
    }
}

impl DriverConfig {
    /// Reject empty or zero core counts, and a grouped results directory
    /// that is the benchmark root or one of its ancestors
    pub fn validate(&self) -> Result<()> {
        if self.core_counts.is_empty() || self.core_counts.contains(&0) {
            return Err(DriverError::InvalidCoreCounts(self.core_counts.clone()));
        }
        if self.grouped {
            if let (Ok(results), Ok(root)) = (self.results_dir.canonicalize(), self.root.canonicalize()) {
                if root.starts_with(&results) {
                    return Err(DriverError::ResultsDirContainsRoot { results_dir: results, root });
                }
            }
        }
        Ok(())
    }
}

/// On-disk configuration; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub core_counts: Option<Vec<usize>>,
    pub results_dir: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub search_dirs: Option<Vec<PathBuf>>,
    pub pinning: Option<Pinning>,
    pub grouped: Option<bool>,
    /// Replaces the built-in benchmark table when present
    pub benchmarks: Option<BTreeMap<String, BenchmarkEntry>>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| DriverError::io(path, e))?;
        Self::parse(path, &text)
    }

    /// `path` only labels errors
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|source| DriverError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay the file onto `base` and build the registry it describes
    pub fn apply(self, mut base: DriverConfig) -> Result<(DriverConfig, BenchmarkRegistry)> {
        if let Some(v) = self.core_counts {
            base.core_counts = v;
        }
        if let Some(v) = self.results_dir {
            base.results_dir = v;
        }
        if let Some(v) = self.root {
            base.root = v;
        }
        if let Some(v) = self.search_dirs {
            base.search_dirs = v;
        }
        if let Some(v) = self.pinning {
            base.pinning = v;
        }
        if let Some(v) = self.grouped {
            base.grouped = v;
        }

        let registry = match self.benchmarks {
            Some(entries) => BenchmarkRegistry::from_entries(entries)?,
            None => build_registry()?,
        };
        Ok((base, registry))
    }
}
