//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section has defaults, so an empty file is a valid configuration.

mod limits;
mod logging;
mod model;
mod sandbox;

pub use limits::FileLimitsConfig;
pub use logging::FileLoggingConfig;
pub use model::FileModelConfig;
pub use sandbox::FileSandboxConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use toolgate_domain::sandbox::ExecutionLimits;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("limits.{0} cannot be 0")]
    ZeroLimit(&'static str),

    #[error("model.name cannot be empty")]
    EmptyModelName,

    #[error("model.backend_url cannot be empty")]
    EmptyBackendUrl,

    #[error("model.request_timeout_secs cannot be 0")]
    ZeroRequestTimeout,

    #[error("sandbox.interpreter cannot be empty")]
    EmptyInterpreter,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Filesystem roots and snippet execution
    pub sandbox: FileSandboxConfig,
    /// Size, count and time caps
    pub limits: FileLimitsConfig,
    /// Model backend
    pub model: FileModelConfig,
    /// Log level and optional log file
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Check the values that would make the gateway unusable.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.limits.validate()?;

        if self.model.name.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        if self.model.backend_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBackendUrl);
        }
        if self.model.request_timeout_secs == 0 {
            return Err(ConfigValidationError::ZeroRequestTimeout);
        }
        if self.sandbox.interpreter.trim().is_empty() {
            return Err(ConfigValidationError::EmptyInterpreter);
        }

        Ok(())
    }

    /// Limits for the reader and runner, with the sandbox `PATH` applied
    pub fn execution_limits(&self) -> ExecutionLimits {
        self.limits
            .to_execution_limits()
            .with_env("PATH", self.sandbox.env_path.clone())
    }
}
