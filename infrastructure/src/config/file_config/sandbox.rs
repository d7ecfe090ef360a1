//! Sandbox configuration from TOML (`[sandbox]` section)
//!
//! ```toml
//! [sandbox]
//! allowed_roots = ["/data"]
//! scratch_dir = "/var/tmp/toolgate-scratch"
//! interpreter = "python3"
//! env_path = "/usr/bin:/bin"
//! denylist = ["os.system", "subprocess"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use toolgate_domain::sandbox::limits::DEFAULT_SANDBOX_PATH;

use crate::sandbox::DEFAULT_DENYLIST;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSandboxConfig {
    /// Directories the file tools may read
    pub allowed_roots: Vec<PathBuf>,
    /// Parent of the per-call working directories; must lie outside the roots
    pub scratch_dir: Option<PathBuf>,
    /// Interpreter name or path for run_python
    pub interpreter: String,
    /// `PATH` inside the sandbox
    pub env_path: String,
    /// Replaces the built-in denylist when set
    pub denylist: Option<Vec<String>>,
}

impl Default for FileSandboxConfig {
    fn default() -> Self {
        Self {
            allowed_roots: vec![PathBuf::from("/data")],
            scratch_dir: None,
            interpreter: "python3".to_string(),
            env_path: DEFAULT_SANDBOX_PATH.to_string(),
            denylist: None,
        }
    }
}

impl FileSandboxConfig {
    /// Configured scratch directory, or `<temp>/toolgate-scratch`
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("toolgate-scratch"))
    }

    pub fn denylist(&self) -> Vec<String> {
        match &self.denylist {
            Some(entries) => entries.clone(),
            None => DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileSandboxConfig::default();
        assert_eq!(
            config.scratch_dir(),
            std::env::temp_dir().join("toolgate-scratch")
        );
        assert!(config.denylist().iter().any(|e| e == "subprocess"));
    }

    #[test]
    fn test_empty_denylist_disables_screening() {
        let config: FileSandboxConfig = toml::from_str("denylist = []").unwrap();
        assert!(config.denylist().is_empty());
    }
}
