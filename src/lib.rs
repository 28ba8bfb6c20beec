//! # Bench-Sweep
//!
//! Runs prebuilt parallel benchmarks across a sweep of core counts, pulls
//! their timings out of stdout, and summarizes them as CSV.

pub mod config;
pub mod error;
pub mod extract;
pub mod locate;
pub mod registry;
pub mod template;
pub mod utils;

/// Re-export tui from utils
pub use utils::tui;

/// Re-export run_all from utils::runner
pub use utils::runner::run_all;

#[cfg(test)]
mod tests {
    use crate::registry::{build_registry, Repetition};

    #[test]
    fn test_all_benchmarks_registry_verify() {
        let registry = build_registry().unwrap();
        let benchmarks = registry.all();

        println!("Verifying {} benchmarks...", benchmarks.len());

        for spec in benchmarks {
            assert!(spec.runs > 0, "'{}' must run at least once", spec.name);
            assert!(
                spec.args.slot_count() <= 2,
                "'{}' has too many argument slots",
                spec.name
            );
            assert!(
                spec.name.starts_with(&spec.family),
                "'{}' is not in family '{}'",
                spec.name,
                spec.family
            );
            if let Repetition::InternalLoop(template) = &spec.repetition {
                assert_eq!(template.slot_count(), 1, "'{}' repeat arg", spec.name);
            }
        }
    }
}
