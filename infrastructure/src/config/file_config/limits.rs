//! Limits configuration from TOML (`[limits]` section)

use super::ConfigValidationError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use toolgate_domain::sandbox::ExecutionLimits;
use toolgate_domain::sandbox::limits::{
    DEFAULT_EXEC_TIMEOUT, DEFAULT_MAX_DIR_ENTRIES, DEFAULT_MAX_FILE_BYTES,
    DEFAULT_MAX_OUTPUT_BYTES, DEFAULT_MAX_SEARCH_MATCHES,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLimitsConfig {
    pub max_file_bytes: u64,
    pub max_dir_entries: usize,
    pub max_search_matches: usize,
    pub exec_timeout_secs: u64,
    pub max_output_bytes: usize,
}

impl Default for FileLimitsConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_dir_entries: DEFAULT_MAX_DIR_ENTRIES,
            max_search_matches: DEFAULT_MAX_SEARCH_MATCHES,
            exec_timeout_secs: DEFAULT_EXEC_TIMEOUT.as_secs(),
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

impl FileLimitsConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let zero = [
            ("max_file_bytes", self.max_file_bytes == 0),
            ("max_dir_entries", self.max_dir_entries == 0),
            ("max_search_matches", self.max_search_matches == 0),
            ("exec_timeout_secs", self.exec_timeout_secs == 0),
            ("max_output_bytes", self.max_output_bytes == 0),
        ];
        match zero.into_iter().find(|(_, is_zero)| *is_zero) {
            Some((field, _)) => Err(ConfigValidationError::ZeroLimit(field)),
            None => Ok(()),
        }
    }

    pub fn to_execution_limits(&self) -> ExecutionLimits {
        ExecutionLimits::default()
            .with_max_file_bytes(self.max_file_bytes)
            .with_max_dir_entries(self.max_dir_entries)
            .with_max_search_matches(self.max_search_matches)
            .with_exec_timeout(Duration::from_secs(self.exec_timeout_secs))
            .with_max_output_bytes(self.max_output_bytes)
    }
}
