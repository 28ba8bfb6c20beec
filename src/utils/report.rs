//! CSV output: per-benchmark timing files, the grouped summary, and the
//! results-directory backup.

use crate::error::{DriverError, Result};
use crate::registry::{BenchmarkSpec, GroupKey};
use crate::utils::stats::Summary;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the grouped summary inside the results directory
pub const ALL_RESULTS_FILE: &str = "all_results.csv";

/// Shortest round-trip text that always keeps a decimal point ("4.0")
pub fn format_float(v: f64) -> String {
    format!("{:?}", v)
}

/// Summaries for one benchmark, one per core count actually run
#[derive(Clone, Debug, PartialEq)]
pub struct ResultRow {
    pub name: String,
    pub columns: Vec<(usize, Summary)>,
}

impl ResultRow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn push(&mut self, cores: usize, summary: Summary) {
        self.columns.push((cores, summary));
    }

    /// Core counts in column order
    pub fn core_counts(&self) -> Vec<usize> {
        self.columns.iter().map(|(cores, _)| *cores).collect()
    }

    /// `<args with <P>>,P=1 avg time (s),stdev (s),stdev (%),...`
    pub fn header_line(&self, spec: &BenchmarkSpec) -> String {
        header_line(&spec.args.for_header(), &self.core_counts())
    }

    /// `<name>,<mean>,<stdev>,<stdev %>,...`; an unset stdev leaves both
    /// of its fields empty
    pub fn data_line(&self) -> String {
        let mut fields = vec![self.name.clone()];
        for (_, summary) in &self.columns {
            fields.push(format_float(summary.mean));
            fields.push(summary.stdev.map(format_float).unwrap_or_default());
            fields.push(
                summary
                    .relative_stdev()
                    .map(format_float)
                    .unwrap_or_default(),
            );
        }
        fields.join(",")
    }
}

/// Header for an argument string and a list of core counts
pub fn header_line(args: &str, core_counts: &[usize]) -> String {
    let mut fields = vec![args.to_string()];
    for cores in core_counts {
        fields.push(format!("P={} avg time (s)", cores));
        fields.push("stdev (s)".to_string());
        fields.push("stdev (%)".to_string());
    }
    fields.join(",")
}

/// Path of a benchmark's own CSV
pub fn timing_csv_path(results_dir: &Path, name: &str) -> PathBuf {
    results_dir.join(format!("{}_timing.csv", name))
}

/// Write `<results>/<name>_timing.csv`: header line and data line
pub fn write_timing_csv(results_dir: &Path, spec: &BenchmarkSpec, row: &ResultRow) -> Result<PathBuf> {
    let path = timing_csv_path(results_dir, &spec.name);
    let text = format!("{}\n{}\n", row.header_line(spec), row.data_line());
    fs::write(&path, text).map_err(|e| DriverError::io(&path, e))?;
    Ok(path)
}

struct Group {
    key: GroupKey,
    /// Widest core-count list seen so far; its labels head the block
    core_counts: Vec<usize>,
    rows: Vec<String>,
}

/// Rows merged by family and argument shape for `all_results.csv`
pub struct GroupedResults {
    groups: Vec<Group>,
}

impl GroupedResults {
    /// One empty group per distinct key, in the order benchmarks will run
    pub fn new<'a>(specs: impl IntoIterator<Item = &'a BenchmarkSpec>) -> Self {
        let mut groups: Vec<Group> = Vec::new();
        for spec in specs {
            let key = spec.group_key();
            if !groups.iter().any(|g| g.key == key) {
                groups.push(Group {
                    key,
                    core_counts: Vec::new(),
                    rows: Vec::new(),
                });
            }
        }
        Self { groups }
    }

    pub fn add(&mut self, spec: &BenchmarkSpec, row: &ResultRow) {
        let key = spec.group_key();
        let index = match self.groups.iter().position(|g| g.key == key) {
            Some(i) => i,
            None => {
                self.groups.push(Group {
                    key,
                    core_counts: Vec::new(),
                    rows: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        let group = &mut self.groups[index];
        if row.columns.len() > group.core_counts.len() {
            group.core_counts = row.core_counts();
        }
        group.rows.push(row.data_line());
    }

    /// Blocks of header and rows, separated by a blank line. Groups with no
    /// rows yet are left out.
    pub fn render(&self) -> String {
        let blocks: Vec<String> = self
            .groups
            .iter()
            .filter(|g| !g.rows.is_empty())
            .map(|g| {
                let mut block = header_line(&g.key.args, &g.core_counts);
                for row in &g.rows {
                    block.push('\n');
                    block.push_str(row);
                }
                block.push('\n');
                block
            })
            .collect();
        blocks.join("\n")
    }

    /// Rewrite `<results>/all_results.csv` in full
    pub fn write(&self, results_dir: &Path) -> Result<PathBuf> {
        let path = results_dir.join(ALL_RESULTS_FILE);
        fs::write(&path, self.render()).map_err(|e| DriverError::io(&path, e))?;
        Ok(path)
    }
}

/// Sibling directory a results directory is backed up to
pub fn backup_path(results_dir: &Path, timestamp: u64) -> PathBuf {
    let name = format!("bkup-{}", timestamp);
    match results_dir.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// `backup_path`, with `-1`, `-2`, ... appended while that name is taken
pub fn unused_backup_path(results_dir: &Path, timestamp: u64) -> PathBuf {
    let base = backup_path(results_dir, timestamp);
    let mut candidate = base.clone();
    let mut n = 0;
    while candidate.exists() {
        n += 1;
        let mut name = base.as_os_str().to_owned();
        name.push(format!("-{}", n));
        candidate = PathBuf::from(name);
    }
    candidate
}

/// Copy `from` recursively into a new directory `to`
pub fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(from).to_path_buf();
            DriverError::io(path, e.into())
        })?;
        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target = to.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| DriverError::io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| DriverError::io(&target, e))?;
        }
    }
    Ok(())
}

/// Get the results directory ready for a run.
///
/// Grouped runs copy an existing, non-empty directory to `bkup-<timestamp>`
/// (suffixed if that already exists) and then empty it. Flat runs only make sure it exists.
///
/// # Returns
/// The backup location, if one was made.
pub fn prepare_results_dir(results_dir: &Path, grouped: bool, timestamp: u64) -> Result<Option<PathBuf>> {
    let mut backup = None;

    if grouped && results_dir.is_dir() {
        let has_entries = fs::read_dir(results_dir)
            .map_err(|e| DriverError::io(results_dir, e))?
            .next()
            .is_some();
        if has_entries {
            let target = unused_backup_path(results_dir, timestamp);
            copy_dir(results_dir, &target)?;
            backup = Some(target);
        }
        fs::remove_dir_all(results_dir).map_err(|e| DriverError::io(results_dir, e))?;
    }

    fs::create_dir_all(results_dir).map_err(|e| DriverError::io(results_dir, e))?;
    Ok(backup)
}
