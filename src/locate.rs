//! Finding benchmark executables on disk.

use crate::error::{DriverError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Program name behind a benchmark name: trailing digits are dropped so
/// argument variants ("lcs-se2") share the binary of "lcs-se".
pub fn program_name(benchmark: &str) -> &str {
    benchmark.trim_end_matches(|c: char| c.is_ascii_digit())
}

/// Search `dirs` (relative to `root`) for a regular file called `program`.
///
/// Directories are walked in order and entries sorted by name, so the first
/// match is deterministic. The returned path is canonical.
pub fn locate_executable(root: &Path, dirs: &[PathBuf], program: &str) -> Result<PathBuf> {
    let searched: Vec<PathBuf> = dirs.iter().map(|d| root.join(d)).collect();

    for dir in searched.iter().filter(|d| d.is_dir()) {
        let found = WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .find(|entry| entry.file_type().is_file() && entry.file_name() == program);

        if let Some(entry) = found {
            return entry
                .path()
                .canonicalize()
                .map_err(|e| DriverError::io(entry.path(), e));
        }
    }

    Err(DriverError::ExecutableNotFound {
        program: program.to_string(),
        searched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_program_name_strips_digit_suffix() {
        assert_eq!(program_name("lcs-se2"), "lcs-se");
        assert_eq!(program_name("lcs-fj"), "lcs-fj");
        assert_eq!(program_name("sw-gf123"), "sw-gf");
        assert_eq!(program_name("fib-sf-stack"), "fib-sf-stack");
    }

    #[test]
    fn test_locate_in_nested_dir() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("futurerd-bench/basic");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("lcs-fj"), "").unwrap();

        let dirs = vec![PathBuf::from("ferret"), PathBuf::from("futurerd-bench")];
        let path = locate_executable(root.path(), &dirs, "lcs-fj").unwrap();
        assert_eq!(path, nested.join("lcs-fj").canonicalize().unwrap());
    }

    #[test]
    fn test_directories_with_the_name_are_ignored() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("future-bench/fib-fj")).unwrap();

        let dirs = vec![PathBuf::from("future-bench")];
        let err = locate_executable(root.path(), &dirs, "fib-fj").unwrap_err();
        assert!(matches!(err, DriverError::ExecutableNotFound { .. }));
    }

    #[test]
    fn test_not_found_lists_searched_dirs() {
        let root = tempfile::tempdir().unwrap();
        let dirs = vec![PathBuf::from("ferret"), PathBuf::from("missing")];
        match locate_executable(root.path(), &dirs, "mm-fj") {
            Err(DriverError::ExecutableNotFound { program, searched }) => {
                assert_eq!(program, "mm-fj");
                assert_eq!(searched.len(), 2);
            }
            other => panic!("expected ExecutableNotFound, got {:?}", other),
        }
    }
}
