//! Process-group cleanup for sandboxed children.

/// Kills a child's whole process group when dropped.
///
/// The child is spawned as the leader of a new group, so its pid is the
/// group id and any processes it forks are reached too.
#[derive(Debug)]
pub(crate) struct ProcessGroupGuard {
    pgid: Option<i32>,
}

impl ProcessGroupGuard {
    pub(crate) fn new(pid: Option<u32>) -> Self {
        Self {
            pgid: pid.and_then(|pid| i32::try_from(pid).ok()).filter(|pid| *pid > 0),
        }
    }

    /// Send SIGKILL to the group now
    pub(crate) fn kill(&mut self) {
        if let Some(pgid) = self.pgid.take() {
            kill_group(pgid);
        }
    }
}

impl Drop for ProcessGroupGuard {
    fn drop(&mut self) {
        self.kill();
    }
}

#[cfg(unix)]
fn kill_group(pgid: i32) {
    // SAFETY: killpg has no memory-safety preconditions
    let rc = unsafe { libc::killpg(pgid, libc::SIGKILL) };
    if rc != 0 {
        tracing::trace!(pgid, error = %std::io::Error::last_os_error(), "killpg failed");
    } else {
        tracing::debug!(pgid, "Killed sandbox process group");
    }
}

#[cfg(not(unix))]
fn kill_group(_pgid: i32) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pid_is_ignored() {
        let mut guard = ProcessGroupGuard::new(None);
        guard.kill();
        let guard = ProcessGroupGuard::new(Some(0));
        assert!(guard.pgid.is_none());
    }

    #[test]
    fn test_kill_fires_once() {
        let guard = ProcessGroupGuard::new(Some(u32::MAX));
        assert!(guard.pgid.is_none());

        // Above the kernel's pid_max, so no real group is signalled
        let mut guard = ProcessGroupGuard::new(Some(4_999_999));
        assert_eq!(guard.pgid, Some(4_999_999));
        guard.kill();
        assert!(guard.pgid.is_none());
    }
}
