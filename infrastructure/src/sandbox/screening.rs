//! Static denylist screen applied to code before it is executed.
//!
//! This is a coarse heuristic that catches the obvious process-spawning and
//! dynamic-evaluation calls a model tends to reach for. It is not a security
//! boundary; the isolated child process is.

use super::SandboxError;
use regex::Regex;
use toolgate_domain::tool::value_objects::ToolError;

/// Substrings rejected by default
pub const DEFAULT_DENYLIST: &[&str] = &[
    "os.system",
    "subprocess",
    "eval",
    "exec",
    "__import__",
    "os.popen",
    "os.spawn",
    "os.fork",
    "importlib",
    "ctypes",
];

/// Compiled denylist
#[derive(Debug, Clone)]
pub struct SnippetScreen {
    rules: Vec<(String, Regex)>,
}

impl SnippetScreen {
    /// Compile a denylist. Dotted entries also match with whitespace around
    /// the dot (`os . system`).
    pub fn new<I, S>(entries: I) -> Result<Self, SandboxError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Vec::new();
        for entry in entries {
            let entry = entry.as_ref().trim();
            if entry.is_empty() {
                continue;
            }
            let pattern = entry
                .split('.')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s*\.\s*");
            let regex = Regex::new(&pattern).map_err(|source| SandboxError::Denylist {
                entry: entry.to_string(),
                source,
            })?;
            rules.push((entry.to_string(), regex));
        }
        Ok(Self { rules })
    }

    /// Screen with [`DEFAULT_DENYLIST`]
    pub fn with_defaults() -> Result<Self, SandboxError> {
        Self::new(DEFAULT_DENYLIST)
    }

    /// Screen that accepts everything
    pub fn permissive() -> Self {
        Self { rules: Vec::new() }
    }

    /// The first denylist entry found in `code`, if any
    pub fn find_match(&self, code: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|(_, regex)| regex.is_match(code))
            .map(|(entry, _)| entry.as_str())
    }

    /// Reject `code` with `AccessDenied` when it hits the denylist
    pub fn check(&self, code: &str) -> Result<(), ToolError> {
        match self.find_match(code) {
            Some(entry) => Err(ToolError::access_denied(format!(
                "Potentially dangerous code detected ({})",
                entry
            ))),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
