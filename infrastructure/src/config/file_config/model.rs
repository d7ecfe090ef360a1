//! Model backend configuration from TOML (`[model]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// Base URL of the Ollama server
    pub backend_url: String,
    /// Model name passed to the backend
    pub name: String,
    /// Whole-request timeout
    pub request_timeout_secs: u64,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:11434".to_string(),
            name: "mistral".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl FileModelConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
