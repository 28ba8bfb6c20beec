//! Building and launching benchmark command lines.

use crate::config::Pinning;
use crate::error::{DriverError, Result};
use crate::registry::BenchmarkSpec;
use crate::utils::cpu_affinity;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// One subprocess invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchCommand {
    /// Full shell command line, including any `taskset` prefix
    pub command_line: String,
    /// Core count the run is confined to
    pub cores: usize,
    /// Apply the affinity mask natively instead of via the command line
    pub pin_native: bool,
}

impl LaunchCommand {
    /// `[taskset -c 0-(P-1)] <exe> <args> [<repeat arg>]`
    pub fn new(spec: &BenchmarkSpec, exe: &Path, cores: usize, pinning: Pinning) -> Self {
        let mut parts = Vec::with_capacity(4);
        if pinning == Pinning::Taskset {
            parts.push(cpu_affinity::taskset_prefix(cores));
        }
        parts.push(exe.display().to_string());

        let args = spec.args.for_cores(cores);
        if !args.is_empty() {
            parts.push(args);
        }
        if let Some(repeat) = spec.repeat_arg() {
            parts.push(repeat);
        }

        Self {
            command_line: parts.join(" "),
            cores,
            pin_native: pinning == Pinning::Native,
        }
    }
}

/// Runs a command and hands back what it printed
pub trait Launcher {
    /// Run to completion and return stdout as text
    fn launch(&mut self, cmd: &LaunchCommand) -> Result<String>;
}

/// Runs commands through `sh -c` in a fixed working directory.
///
/// There is no timeout: a benchmark that never exits blocks the driver.
pub struct ShellLauncher {
    workdir: PathBuf,
}

impl ShellLauncher {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

impl Launcher for ShellLauncher {
    fn launch(&mut self, cmd: &LaunchCommand) -> Result<String> {
        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(&cmd.command_line)
            .current_dir(&self.workdir)
            .stdin(Stdio::null());

        if cmd.pin_native && !cpu_affinity::pin_child(&mut command, cmd.cores) {
            warn!("native CPU pinning unsupported on this platform, running unpinned");
        }

        let output = command.output().map_err(|source| DriverError::Spawn {
            command: cmd.command_line.clone(),
            source,
        })?;

        if !output.status.success() {
            warn!(status = %output.status, command = %cmd.command_line, "benchmark exited unsuccessfully");
        }
        if !output.stderr.is_empty() {
            debug!(stderr = %String::from_utf8_lossy(&output.stderr).trim(), "benchmark stderr");
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
