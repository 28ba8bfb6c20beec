//! Error types for the benchmark driver.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for driver operations
pub type Result<T> = std::result::Result<T, DriverError>;

/// Everything that can stop a benchmark run
#[derive(Error, Debug)]
pub enum DriverError {
    /// Filesystem failure on a specific path
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not launch the shell for a benchmark command
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Benchmark printed a timing token that is not a number
    #[error("Malformed timing output from '{benchmark}': {text:?} is not a number")]
    MalformedTiming { benchmark: String, text: String },

    /// Summary line without the `label: value` shape
    #[error("Malformed timing output from '{benchmark}': no value in line {line:?}")]
    MissingValue { benchmark: String, line: String },

    /// Argument template with unsupported placeholders
    #[error("Invalid argument template for '{benchmark}': {reason}")]
    InvalidTemplate { benchmark: String, reason: String },

    /// Two registry entries share a name
    #[error("Benchmark '{0}' is registered twice")]
    DuplicateBenchmark(String),

    /// Name given on the command line is not in the registry
    #[error("Unknown benchmark '{0}' (use --list-targets to see available benchmarks)")]
    UnknownBenchmark(String),

    /// No executable with the program name in any search directory
    #[error("Executable '{program}' not found under {searched:?}")]
    ExecutableNotFound {
        program: String,
        searched: Vec<PathBuf>,
    },

    /// Configuration file could not be parsed
    #[error("Invalid configuration {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Clearing the results directory would delete the benchmarks themselves
    #[error("Results directory {results_dir} contains the benchmark root {root}, refusing to clear it")]
    ResultsDirContainsRoot { results_dir: PathBuf, root: PathBuf },

    /// Sweep list is empty or contains zero
    #[error("Invalid core counts {0:?}: need at least one count, all greater than zero")]
    InvalidCoreCounts(Vec<usize>),
}

impl DriverError {
    /// Wrap an `std::io::Error` with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DriverError::Io {
            path: path.into(),
            source,
        }
    }
}
