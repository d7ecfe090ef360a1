//! Sandboxed snippet execution.
//!
//! Each call gets a fresh working directory under the scratch root, a
//! cleared environment, a null stdin and a wall-clock limit. The child is
//! the leader of its own process group, and that group is killed when the
//! call returns, times out, or is dropped, taking down everything it spawned.

use super::SandboxError;
use super::path_guard::PathGuard;
use super::process::ProcessGroupGuard;
use super::screening::SnippetScreen;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use toolgate_domain::sandbox::ExecutionLimits;
use toolgate_domain::tool::value_objects::ToolError;
use tracing::{debug, info, warn};

/// Captured result of a finished snippet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetOutput {
    /// Combined, formatted stdout / stderr / exit status
    pub text: String,
    pub exit_code: Option<i32>,
    /// Whether either stream hit the output cap
    pub truncated: bool,
    /// Raw bytes captured across both streams
    pub bytes: usize,
}

/// Resolve an interpreter name (or path) on `PATH`
pub fn locate_interpreter(name: &str) -> Result<PathBuf, SandboxError> {
    which::which(name).map_err(|source| SandboxError::InterpreterNotFound {
        name: name.to_string(),
        source,
    })
}

/// Runs Python snippets in an isolated child process
#[derive(Debug)]
pub struct SnippetRunner {
    interpreter: PathBuf,
    scratch_root: PathBuf,
    limits: ExecutionLimits,
    screen: SnippetScreen,
}

impl SnippetRunner {
    /// Build a runner.
    ///
    /// The scratch root is created if missing and must not lie inside any
    /// of the guard's allowed roots.
    pub fn new(
        interpreter: impl Into<PathBuf>,
        scratch_root: impl AsRef<Path>,
        limits: ExecutionLimits,
        screen: SnippetScreen,
        guard: &PathGuard,
    ) -> Result<Self, SandboxError> {
        limits.validate()?;

        let scratch_root = scratch_root.as_ref();
        let scratch_error = |source| SandboxError::Scratch {
            path: scratch_root.to_path_buf(),
            source,
        };
        std::fs::create_dir_all(scratch_root).map_err(scratch_error)?;
        let scratch_root = scratch_root.canonicalize().map_err(scratch_error)?;

        if let Some(root) = guard
            .roots()
            .iter()
            .find(|root| scratch_root.starts_with(root))
        {
            return Err(SandboxError::ScratchInsideRoot {
                path: scratch_root,
                root: root.clone(),
            });
        }

        let interpreter = interpreter.into();
        debug!(
            interpreter = %interpreter.display(),
            scratch = %scratch_root.display(),
            "Snippet runner ready"
        );

        Ok(Self {
            interpreter,
            scratch_root,
            limits,
            screen,
        })
    }

    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    pub fn scratch_root(&self) -> &Path {
        &self.scratch_root
    }

    pub fn limits(&self) -> &ExecutionLimits {
        &self.limits
    }

    /// Screen and run `code`.
    ///
    /// A non-zero exit is not an error; it is reported in the output text.
    /// Errors are `AccessDenied` (denylist), `Timeout` and `ExecutionFailed`.
    pub async fn run_snippet(&self, code: &str) -> Result<SnippetOutput, ToolError> {
        self.screen.check(code)?;

        let workdir = tempfile::Builder::new()
            .prefix("run-")
            .tempdir_in(&self.scratch_root)
            .map_err(|e| {
                ToolError::execution_failed(format!("Failed to create working directory: {}", e))
            })?;

        let mut command = Command::new(&self.interpreter);
        command
            .arg("-I")
            .arg("-B")
            .arg("-c")
            .arg(code)
            .env_clear()
            .envs(&self.limits.env)
            .current_dir(workdir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        command.process_group(0);

        kill_with_parent(&mut command);

        let started = Instant::now();
        let mut child = command.spawn().map_err(|e| {
            ToolError::execution_failed(format!(
                "Failed to start {}: {}",
                self.interpreter.display(),
                e
            ))
        })?;
        let mut group = ProcessGroupGuard::new(child.id());
        info!(pid = ?child.id(), "Snippet started");

        let cap = (self.limits.max_output_bytes / 2).max(1);
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let outcome = tokio::time::timeout(self.limits.exec_timeout, async {
            let (out, err, status) = tokio::join!(
                read_bounded(stdout, cap),
                read_bounded(stderr, cap),
                child.wait()
            );
            Ok::<_, io::Error>((out?, err?, status?))
        })
        .await;

        match outcome {
            Err(_) => {
                group.kill();
                let _ = child.start_kill();
                let _ = child.wait().await;
                warn!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Snippet timed out"
                );
                Err(ToolError::timeout(format!(
                    "Code execution timed out ({} limit)",
                    describe_duration(self.limits.exec_timeout)
                )))
            }
            Ok(Err(e)) => {
                group.kill();
                Err(ToolError::execution_failed(format!(
                    "Failed to collect snippet output: {}",
                    e
                )))
            }
            Ok(Ok(((stdout, out_truncated), (stderr, err_truncated), status))) => {
                // Anything the snippet left running in its group dies with it
                group.kill();
                let truncated = out_truncated || err_truncated;
                debug!(
                    exit_code = ?status.code(),
                    stdout_bytes = stdout.len(),
                    stderr_bytes = stderr.len(),
                    truncated,
                    "Snippet finished"
                );
                Ok(SnippetOutput {
                    text: format_output(&stdout, &stderr, status, truncated),
                    exit_code: status.code(),
                    truncated,
                    bytes: stdout.len() + stderr.len(),
                })
            }
        }
    }
}

/// Ask the kernel to SIGKILL the child if this process dies first.
#[cfg(target_os = "linux")]
fn kill_with_parent(command: &mut Command) {
    // SAFETY: the closure only calls prctl, which is async-signal-safe
    unsafe {
        command.pre_exec(|| {
            if libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGKILL) != 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        });
    }
}

#[cfg(not(target_os = "linux"))]
fn kill_with_parent(_command: &mut Command) {}

/// Read up to `cap` bytes, then keep draining so the child never blocks on
/// a full pipe.
async fn read_bounded<R>(reader: Option<R>, cap: usize) -> io::Result<(Vec<u8>, bool)>
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return Ok((Vec::new(), false));
    };

    let mut kept = Vec::new();
    let mut truncated = false;
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        let room = cap.saturating_sub(kept.len());
        if n > room {
            truncated = true;
        }
        kept.extend_from_slice(&chunk[..n.min(room)]);
    }
    Ok((kept, truncated))
}

fn format_output(stdout: &[u8], stderr: &[u8], status: ExitStatus, truncated: bool) -> String {
    let mut text = String::from_utf8_lossy(stdout).into_owned();

    let stderr = String::from_utf8_lossy(stderr);
    if !stderr.trim().is_empty() {
        text.push_str("\nStderr:\n");
        text.push_str(&stderr);
    }

    match status.code() {
        Some(0) => {}
        Some(code) => text.push_str(&format!("\nExit code: {}", code)),
        None => text.push_str("\nTerminated by signal"),
    }

    if truncated {
        text.push_str("\n... (output truncated)");
    }

    let text = text.trim();
    if text.is_empty() {
        "(No output)".to_string()
    } else {
        text.to_string()
    }
}

fn describe_duration(duration: Duration) -> String {
    if duration.subsec_millis() == 0 && duration.as_secs() > 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{}ms", duration.as_millis())
    }
}
