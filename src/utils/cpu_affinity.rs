//! CPU affinity for benchmark subprocesses.
//!
//! Benchmarks at core count `P` are confined to the first `P` CPUs. This is done
//! either by prefixing the command with `taskset -c 0-(P-1)` or natively, by
//! setting the affinity mask of the child between fork and exec.

use std::process::Command;

// ============================================================================
// Linux implementation using libc
// ============================================================================

#[cfg(target_os = "linux")]
mod platform {
    use std::os::unix::process::CommandExt;
    use std::process::Command;

    /// Get all online CPU core IDs
    pub fn get_core_ids() -> Option<Vec<usize>> {
        unsafe {
            let num_cpus = libc::sysconf(libc::_SC_NPROCESSORS_ONLN);
            if num_cpus <= 0 {
                return None;
            }
            Some((0..num_cpus as usize).collect())
        }
    }

    /// Restrict the spawned child to the first `cores` CPUs this process may
    /// run on (`0..cores` on an unrestricted machine)
    pub fn pin_child(cmd: &mut Command, cores: usize) -> bool {
        let set = unsafe {
            let mut allowed: libc::cpu_set_t = std::mem::zeroed();
            if libc::sched_getaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &mut allowed) != 0 {
                return false;
            }

            let mut set: libc::cpu_set_t = std::mem::zeroed();
            libc::CPU_ZERO(&mut set);
            (0..libc::CPU_SETSIZE as usize)
                .filter(|&cpu| libc::CPU_ISSET(cpu, &allowed))
                .take(cores)
                .for_each(|cpu| libc::CPU_SET(cpu, &mut set));
            set
        };

        // Runs in the forked child: only async-signal-safe calls.
        unsafe {
            cmd.pre_exec(move || {
                if libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set) == 0 {
                    Ok(())
                } else {
                    Err(std::io::Error::last_os_error())
                }
            });
        }
        true
    }
}

// ============================================================================
// Other Unix: core count only, no affinity API
// ============================================================================

#[cfg(all(unix, not(target_os = "linux")))]
mod platform {
    use std::process::Command;

    pub fn get_core_ids() -> Option<Vec<usize>> {
        unsafe {
            let num_cpus = libc::sysconf(libc::_SC_NPROCESSORS_ONLN);
            if num_cpus <= 0 {
                return None;
            }
            Some((0..num_cpus as usize).collect())
        }
    }

    pub fn pin_child(_cmd: &mut Command, _cores: usize) -> bool {
        false
    }
}

// ============================================================================
// Fallback
// ============================================================================

#[cfg(not(unix))]
mod platform {
    use std::process::Command;

    pub fn get_core_ids() -> Option<Vec<usize>> {
        std::thread::available_parallelism()
            .ok()
            .map(|n| (0..n.get()).collect())
    }

    pub fn pin_child(_cmd: &mut Command, _cores: usize) -> bool {
        false
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Get all online CPU core IDs
pub fn get_core_ids() -> Option<Vec<usize>> {
    platform::get_core_ids()
}

/// Number of online CPUs, if it can be determined
pub fn online_cpus() -> Option<usize> {
    get_core_ids().map(|ids| ids.len())
}

/// CPU list in `taskset -c` syntax covering CPUs `0..cores`
pub fn cpu_list(cores: usize) -> String {
    format!("0-{}", cores.saturating_sub(1))
}

/// Prefix that pins a shell command to CPUs `0..cores`
pub fn taskset_prefix(cores: usize) -> String {
    format!("taskset -c {}", cpu_list(cores))
}

/// Confine the child spawned from `cmd` to `cores` CPUs, lowest IDs first.
///
/// # Returns
/// `false` if the affinity mask cannot be set here; the child then runs unpinned.
pub fn pin_child(cmd: &mut Command, cores: usize) -> bool {
    platform::pin_child(cmd, cores)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_core_ids() {
        let cores = get_core_ids();
        assert!(cores.is_some(), "Should be able to get core IDs");
        assert!(!cores.unwrap().is_empty(), "Should have at least one core");
    }

    #[test]
    fn test_cpu_list() {
        assert_eq!(cpu_list(1), "0-0");
        assert_eq!(cpu_list(16), "0-15");
        assert_eq!(taskset_prefix(4), "taskset -c 0-3");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_pinned_child_runs() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("exit 0");
        assert!(pin_child(&mut cmd, 1));
        let status = cmd.status().unwrap();
        assert!(status.success());
    }
}
