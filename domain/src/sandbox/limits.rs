//! Execution limits shared by the reader and the snippet executor.

use crate::core::error::DomainError;
use std::collections::BTreeMap;
use std::time::Duration;

/// Default maximum file size readable in one call (1 MiB)
pub const DEFAULT_MAX_FILE_BYTES: u64 = 1024 * 1024;
/// Default maximum number of directory entries returned
pub const DEFAULT_MAX_DIR_ENTRIES: usize = 1000;
/// Default maximum number of search matches returned
pub const DEFAULT_MAX_SEARCH_MATCHES: usize = 50;
/// Default wall-clock limit for a snippet
pub const DEFAULT_EXEC_TIMEOUT: Duration = Duration::from_secs(10);
/// Default cap on captured stdout + stderr
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 64 * 1024;
/// Default `PATH` inside the sandbox
pub const DEFAULT_SANDBOX_PATH: &str = "/usr/bin:/bin";

/// Limits applied to every filesystem and execution tool.
///
/// Built once at startup and shared read-only between concurrent requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionLimits {
    pub max_file_bytes: u64,
    pub max_dir_entries: usize,
    pub max_search_matches: usize,
    pub exec_timeout: Duration,
    pub max_output_bytes: usize,
    /// The complete environment of a sandboxed child process
    pub env: BTreeMap<String, String>,
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        let mut env = BTreeMap::new();
        env.insert("PATH".to_string(), DEFAULT_SANDBOX_PATH.to_string());
        env.insert("PYTHONDONTWRITEBYTECODE".to_string(), "1".to_string());

        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_dir_entries: DEFAULT_MAX_DIR_ENTRIES,
            max_search_matches: DEFAULT_MAX_SEARCH_MATCHES,
            exec_timeout: DEFAULT_EXEC_TIMEOUT,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            env,
        }
    }
}

impl ExecutionLimits {
    pub fn with_max_file_bytes(mut self, bytes: u64) -> Self {
        self.max_file_bytes = bytes;
        self
    }

    pub fn with_max_dir_entries(mut self, entries: usize) -> Self {
        self.max_dir_entries = entries;
        self
    }

    pub fn with_max_search_matches(mut self, matches: usize) -> Self {
        self.max_search_matches = matches;
        self
    }

    pub fn with_exec_timeout(mut self, timeout: Duration) -> Self {
        self.exec_timeout = timeout;
        self
    }

    pub fn with_max_output_bytes(mut self, bytes: usize) -> Self {
        self.max_output_bytes = bytes;
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Reject limits that would make every call fail
    pub fn validate(&self) -> Result<(), DomainError> {
        let zero = if self.max_file_bytes == 0 {
            Some("max_file_bytes")
        } else if self.max_dir_entries == 0 {
            Some("max_dir_entries")
        } else if self.max_search_matches == 0 {
            Some("max_search_matches")
        } else if self.exec_timeout.is_zero() {
            Some("exec_timeout")
        } else if self.max_output_bytes == 0 {
            Some("max_output_bytes")
        } else {
            None
        };

        match zero {
            Some(field) => Err(DomainError::InvalidLimits(format!(
                "{} must be greater than zero",
                field
            ))),
            None => Ok(()),
        }
    }
}
