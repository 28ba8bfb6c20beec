//! Runs the driver against shell-script stand-ins for real benchmarks.
#![cfg(unix)]

use bench_sweep::config::{ConfigFile, DriverConfig, Pinning};
use bench_sweep::utils::{Outcome, ShellLauncher};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::Command;

const CONFIG: &str = r#"{
    "core_counts": [1, 2],
    "benchmarks": {
        "hw-fj":  { "args": "in.avi 104 {}", "runs": 3 },
        "lcs-fj": { "args": "-n 10 -b 2", "runs": 4 },
        "lcs-se": { "args": "-n 10 -b 2", "runs": 4 },
        "mm-fj":  { "args": "-n 64", "runs": 2 }
    }
}"#;

fn write_script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn setup() -> (tempfile::TempDir, DriverConfig, bench_sweep::registry::BenchmarkRegistry) {
    let root = tempfile::tempdir().unwrap();
    let bin = root.path().join("futurerd-bench/basic");
    fs::create_dir_all(&bin).unwrap();

    write_script(
        &bin,
        "hw-fj",
        r#"printf '%s\n' "$*" >> "$(dirname "$0")/hw-fj.calls"
echo "decoded 104 frames"
echo "hw time: 120.0 ms""#,
    );
    write_script(
        &bin,
        "lcs-fj",
        r#"printf '%s\n' "$*" >> "$(dirname "$0")/lcs-fj.calls"
echo "Running time 1: 2.0 s"
echo "Running time average: 2.5 s"
echo "Std. dev: 0.5 s (20.000%)""#,
    );
    write_script(&bin, "lcs-se", r#"echo "Running time average: 9.0 s""#);

    let file = ConfigFile::parse(Path::new("test.json"), CONFIG).unwrap();
    let base = DriverConfig {
        results_dir: root.path().join("bench-results"),
        root: root.path().to_path_buf(),
        pinning: Pinning::None,
        ..DriverConfig::default()
    };
    let (config, registry) = file.apply(base).unwrap();
    (root, config, registry)
}

#[test]
fn test_full_run_writes_csvs() {
    let (root, config, registry) = setup();
    let specs = registry.select(&[]).unwrap();
    let mut launcher = ShellLauncher::new(&config.root);

    let mut completed = Vec::new();
    let summary = bench_sweep::run_all(&specs, &config, &mut launcher, |spec, outcome| {
        if matches!(outcome, Outcome::Completed(_)) {
            completed.push(spec.name.clone());
        }
    })
    .unwrap();

    assert_eq!(completed, vec!["lcs-se", "lcs-fj", "hw-fj"]);
    assert_eq!(summary.skipped, vec!["mm-fj"]);
    assert!(summary.backup.is_none());

    let bin = root.path().join("futurerd-bench/basic");

    // Three launches per core count, both slots substituted.
    let hw_calls = fs::read_to_string(bin.join("hw-fj.calls")).unwrap();
    assert_eq!(
        hw_calls.lines().collect::<Vec<_>>(),
        vec![
            "in.avi 104 1",
            "in.avi 104 1",
            "in.avi 104 1",
            "in.avi 104 2",
            "in.avi 104 2",
            "in.avi 104 2"
        ]
    );

    // One launch per core count with the repetition argument appended.
    let lcs_calls = fs::read_to_string(bin.join("lcs-fj.calls")).unwrap();
    assert_eq!(
        lcs_calls.lines().collect::<Vec<_>>(),
        vec!["-n 10 -b 2 -r 4", "-n 10 -b 2 -r 4"]
    );

    let results = &config.results_dir;
    let lcs = fs::read_to_string(results.join("lcs-fj_timing.csv")).unwrap();
    assert_eq!(
        lcs,
        "-n 10 -b 2,P=1 avg time (s),stdev (s),stdev (%),P=2 avg time (s),stdev (s),stdev (%)\n\
         lcs-fj,2.5,0.5,20.0,2.5,0.5,20.0\n"
    );

    let lcs_se = fs::read_to_string(results.join("lcs-se_timing.csv")).unwrap();
    assert_eq!(
        lcs_se,
        "-n 10 -b 2,P=1 avg time (s),stdev (s),stdev (%)\nlcs-se,9.0,,\n"
    );

    let hw = fs::read_to_string(results.join("hw-fj_timing.csv")).unwrap();
    assert_eq!(hw.lines().next(), Some("in.avi 104 <P>,P=1 avg time (s),stdev (s),stdev (%),P=2 avg time (s),stdev (s),stdev (%)"));
    assert!(hw.lines().nth(1).unwrap().starts_with("hw-fj,0.12,0.0,0.0,0.12,"));

    assert!(!results.join("mm-fj_timing.csv").exists());

    let all = fs::read_to_string(results.join("all_results.csv")).unwrap();
    assert_eq!(
        all,
        format!(
            "-n 10 -b 2,P=1 avg time (s),stdev (s),stdev (%),P=2 avg time (s),stdev (s),stdev (%)\n\
             lcs-se,9.0,,\n\
             lcs-fj,2.5,0.5,20.0,2.5,0.5,20.0\n\
             \n\
             {}",
            hw
        )
    );
}

#[test]
fn test_second_run_backs_up_first() {
    let (root, config, registry) = setup();
    let specs = registry.select(&["lcs-se".to_string()]).unwrap();
    let mut launcher = ShellLauncher::new(&config.root);

    bench_sweep::run_all(&specs, &config, &mut launcher, |_, _| {}).unwrap();
    let summary = bench_sweep::run_all(&specs, &config, &mut launcher, |_, _| {}).unwrap();

    let backup = summary.backup.expect("second run should back up the first");
    assert!(backup.starts_with(root.path()));
    assert!(backup
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("bkup-"));
    assert!(backup.join("lcs-se_timing.csv").exists());
    assert!(config.results_dir.join("lcs-se_timing.csv").exists());
}

#[test]
fn test_results_dir_at_root_is_refused() {
    let (root, mut config, registry) = setup();
    config.results_dir = root.path().to_path_buf();
    let specs = registry.select(&["lcs-se".to_string()]).unwrap();
    let mut launcher = ShellLauncher::new(&config.root);

    assert!(bench_sweep::run_all(&specs, &config, &mut launcher, |_, _| {}).is_err());
    assert!(root.path().join("futurerd-bench/basic/lcs-se").exists());
    assert_eq!(
        fs::read_dir(root.path())
            .unwrap()
            .filter(|e| e.as_ref().unwrap().file_name().to_string_lossy().starts_with("bkup-"))
            .count(),
        0
    );
}

#[cfg(target_os = "linux")]
#[test]
fn test_native_pinning_single_core() {
    let (_root, mut config, registry) = setup();
    config.pinning = Pinning::Native;
    config.core_counts = vec![1];
    let specs = registry.select(&["lcs-fj".to_string()]).unwrap();
    let mut launcher = ShellLauncher::new(&config.root);

    let summary = bench_sweep::run_all(&specs, &config, &mut launcher, |_, _| {}).unwrap();
    assert_eq!(summary.written.len(), 1);
}

#[test]
fn test_cli_list_targets_has_no_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_run-benchmarks"))
        .arg("--list-targets")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let names: Vec<&str> = stdout
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(names.first(), Some(&"sw-sf"));
    assert_eq!(names.last(), Some(&"bst-fj"));
    assert_eq!(names.len(), 35);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_cli_unknown_benchmark_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_run-benchmarks"))
        .arg("no-such-bench")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(!dir.path().join("bench-results").exists());
}
