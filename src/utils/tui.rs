//! Text User Interface (TUI) utilities.
//!
//! Handles formatted output for the CLI.

use crate::registry::{BenchmarkRegistry, BenchmarkSpec};
use crate::utils::report::ResultRow;
use crate::utils::runner::{Outcome, RunSummary, SkipReason};
use terminal_size::{terminal_size, Width};

/// Get the current terminal width, constrained to a reasonable range
fn get_term_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        (w as usize).clamp(40, 200)
    } else {
        80
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(width.saturating_sub(3)).collect();
        result.push_str("...");
        result
    }
}

/// Print the application header
pub fn print_header() {
    let term_width = get_term_width().min(80);
    let title = " Benchmark Sweep ";
    let padding = term_width.saturating_sub(title.len() + 2) / 2;
    let right_padding = term_width.saturating_sub(padding + title.len());

    let border = "═".repeat(term_width);

    println!("╔{}╗", border);
    println!(
        "║{}{}{}║",
        " ".repeat(padding),
        title,
        " ".repeat(right_padding)
    );
    println!("╚{}╝", border);
    println!();
}

/// One `--list-targets` line: name, family/variant, core sweep, arguments
fn target_line(spec: &BenchmarkSpec, args_width: usize) -> String {
    let cores = if spec.single_core { "1 core" } else { "sweep" };
    format!(
        "{:<20} [{:<6} {:<11}] {:<6} {}",
        spec.name,
        spec.family,
        spec.variant,
        cores,
        truncate(spec.args.raw(), args_width)
    )
}

/// Print every configured benchmark in run order
pub fn print_available_benchmarks(registry: &BenchmarkRegistry) {
    let term_width = get_term_width();
    let args_width = term_width.saturating_sub(48).max(20);

    for spec in registry.all() {
        println!("{}", target_line(spec, args_width));
    }
}

/// Print the summary table for one finished benchmark.
///
/// Speedup is relative to the first core count run.
pub fn print_results_table(spec: &BenchmarkSpec, row: &ResultRow) {
    if row.columns.is_empty() {
        return;
    }

    let term_width = get_term_width();
    let table_width = term_width.saturating_sub(4).min(72);

    let baseline = row.columns[0].1.mean;

    println!(
        "  {} ({} x{}, {})",
        spec.name,
        spec.extraction.name(),
        spec.runs,
        truncate(&spec.args.for_header(), table_width.saturating_sub(spec.name.len() + 16))
    );
    println!("  {}", "─".repeat(table_width));
    println!(
        "  {:>6} {:>14} {:>14} {:>10} {:>9}",
        "Cores", "Mean (s)", "Stdev (s)", "Stdev (%)", "Speedup"
    );
    println!("  {}", "─".repeat(table_width));

    for (cores, summary) in &row.columns {
        let stdev = summary
            .stdev
            .map(|s| format!("{:.6}", s))
            .unwrap_or_else(|| "-".to_string());
        let rel = summary
            .relative_stdev()
            .map(|r| format!("{:.2}%", r))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:>6} {:>14.6} {:>14} {:>10} {:>8.2}x",
            cores,
            summary.mean,
            stdev,
            rel,
            baseline / summary.mean
        );
    }
    println!();
}

/// Print what happened to one benchmark
pub fn print_outcome(spec: &BenchmarkSpec, outcome: &Outcome) {
    match outcome {
        Outcome::Completed(row) => print_results_table(spec, row),
        Outcome::Skipped(SkipReason::NotFound { program }) => {
            println!("  {}: skipped, executable '{}' not found", spec.name, program);
            println!();
        }
        Outcome::Skipped(SkipReason::NoSamples { cores }) => {
            println!("  {}: skipped, no timings parsed at P={}", spec.name, cores);
            println!();
        }
    }
}

/// Print the closing summary of a run
pub fn print_run_summary(summary: &RunSummary) {
    println!(
        "{} benchmark(s) written, {} skipped",
        summary.written.len(),
        summary.skipped.len()
    );
    if !summary.skipped.is_empty() {
        println!("  Skipped: {}", summary.skipped.join(", "));
    }
    if let Some(path) = &summary.all_results {
        println!("  Grouped results: {}", path.display());
    }
    if let Some(path) = &summary.backup {
        println!("  Previous results backed up to: {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long argument string", 10), "a long ...");
    }

    #[test]
    fn test_target_line_shows_variant() {
        let registry = crate::registry::build_registry().unwrap();
        let line = target_line(registry.find("mm-se").unwrap(), 40);
        assert_eq!(line, format!("{:<20} [mm     se         ] 1 core -n 4096", "mm-se"));

        let line = target_line(registry.find("ferret-cilk-future").unwrap(), 40);
        assert!(line.contains("[ferret cilk-future]"));
        assert!(line.contains(" sweep "));
    }
}
