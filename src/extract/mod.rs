//! # Timing Extraction
//!
//! Benchmarks report their timings in one of a few ad hoc text formats.
//! Each format is one [`Extraction`] variant, chosen once per benchmark when
//! the registry is built.
//!
//! | Strategy  | Rule                                                              |
//! |-----------|-------------------------------------------------------------------|
//! | `Ferret`  | third whitespace token of the whole output, in seconds            |
//! | `Bst`     | third token of the third line, in milliseconds                    |
//! | `Hw`      | every line with `time`: first token after the first colon, in ms  |
//! | `Summary` | `average` line sets the mean, `Std. dev` line sets the stdev      |
//!
//! A missing line or token yields no sample. A token that is present but is
//! not a number is an error.

pub mod test;

use crate::error::{DriverError, Result};
use serde::Deserialize;

/// How timings are pulled out of a benchmark's stdout
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extraction {
    Ferret,
    Bst,
    Hw,
    Summary,
}

/// What one run's output contributed
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extracted {
    /// Per-run samples in seconds
    pub samples: Vec<f64>,
    /// Mean reported directly by the benchmark
    pub mean: Option<f64>,
    /// Standard deviation reported directly by the benchmark
    pub stdev: Option<f64>,
}

impl Extraction {
    /// Infer the strategy from a benchmark name.
    ///
    /// Checked in the order `ferret`, `bst`, `hw`.
    pub fn infer(name: &str) -> Self {
        if name.contains("ferret") {
            Extraction::Ferret
        } else if name.contains("bst") {
            Extraction::Bst
        } else if name.contains("hw") {
            Extraction::Hw
        } else {
            Extraction::Summary
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Extraction::Ferret => "ferret",
            Extraction::Bst => "bst",
            Extraction::Hw => "hw",
            Extraction::Summary => "summary",
        }
    }

    /// Parse one run's stdout. `benchmark` is used in error messages only.
    pub fn extract(&self, benchmark: &str, output: &str) -> Result<Extracted> {
        let mut found = Extracted::default();
        match self {
            Extraction::Ferret => {
                if let Some(token) = output.split_whitespace().nth(2) {
                    found.samples.push(parse_number(benchmark, token)?);
                }
            }
            Extraction::Bst => {
                let token = output
                    .split('\n')
                    .nth(2)
                    .and_then(|line| line.split_whitespace().nth(2));
                if let Some(token) = token {
                    found.samples.push(parse_number(benchmark, token)? / 1000.0);
                }
            }
            Extraction::Hw => {
                for line in output.lines().filter(|l| l.contains("time")) {
                    let ms = value_after_colon(benchmark, line)?;
                    found.samples.push(ms / 1000.0);
                }
            }
            Extraction::Summary => {
                for line in output.lines() {
                    if line.contains("average") {
                        found.mean = Some(value_after_colon(benchmark, line)?);
                    } else if line.contains("Std. dev") {
                        found.stdev = Some(value_after_colon(benchmark, line)?);
                        break;
                    }
                }
            }
        }
        Ok(found)
    }
}

/// First token between the first and second colon of `line`
fn value_after_colon(benchmark: &str, line: &str) -> Result<f64> {
    let token = line
        .split(':')
        .nth(1)
        .and_then(|field| field.split_whitespace().next())
        .ok_or_else(|| DriverError::MissingValue {
            benchmark: benchmark.to_string(),
            line: line.to_string(),
        })?;
    parse_number(benchmark, token)
}

fn parse_number(benchmark: &str, token: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|_| DriverError::MalformedTiming {
            benchmark: benchmark.to_string(),
            text: token.to_string(),
        })
}
