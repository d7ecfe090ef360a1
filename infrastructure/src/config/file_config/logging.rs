//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Filter directive used when no `-v` flag or `RUST_LOG` is given
    pub level: Option<String>,
    /// Also write logs (without ANSI colors) to this file
    pub file: Option<PathBuf>,
}
