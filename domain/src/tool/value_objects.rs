//! Tool domain value objects: immutable result and error types
//!
//! Every dispatch produces a [`ToolResult`]. Failures are carried as data in
//! a [`ToolError`] whose [`ToolErrorKind`] classifies what went wrong; no
//! tool failure is ever raised past the registry boundary.

use serde::{Deserialize, Serialize};

/// Classification of a tool failure.
///
/// | Kind | Code | Raised by |
/// |------|------|-----------|
/// | `AccessDenied` | `ACCESS_DENIED` | path guard, denylist screen, OS permission errors |
/// | `NotFound` | `NOT_FOUND` | reader (missing file or directory) |
/// | `NotAFile` | `NOT_A_FILE` | reader (directory passed to `read_file`) |
/// | `TooLarge` | `TOO_LARGE` | reader (file over the byte limit) |
/// | `Timeout` | `TIMEOUT` | sandboxed executor |
/// | `ToolNotFound` | `TOOL_NOT_FOUND` | registry (unknown tool name) |
/// | `InvalidArguments` | `INVALID_ARGUMENTS` | registry validation, tool argument checks |
/// | `ExecutionFailed` | `EXECUTION_FAILED` | I/O failures, spawn failures, panics |
/// | `ParseAmbiguous` | `PARSE_AMBIGUOUS` | extractor diagnostics only |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolErrorKind {
    AccessDenied,
    NotFound,
    NotAFile,
    TooLarge,
    Timeout,
    ToolNotFound,
    InvalidArguments,
    ExecutionFailed,
    ParseAmbiguous,
}

impl ToolErrorKind {
    pub fn as_code(&self) -> &'static str {
        match self {
            ToolErrorKind::AccessDenied => "ACCESS_DENIED",
            ToolErrorKind::NotFound => "NOT_FOUND",
            ToolErrorKind::NotAFile => "NOT_A_FILE",
            ToolErrorKind::TooLarge => "TOO_LARGE",
            ToolErrorKind::Timeout => "TIMEOUT",
            ToolErrorKind::ToolNotFound => "TOOL_NOT_FOUND",
            ToolErrorKind::InvalidArguments => "INVALID_ARGUMENTS",
            ToolErrorKind::ExecutionFailed => "EXECUTION_FAILED",
            ToolErrorKind::ParseAmbiguous => "PARSE_AMBIGUOUS",
        }
    }
}

impl std::fmt::Display for ToolErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// Error that occurred during tool dispatch or execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    /// Failure classification
    pub kind: ToolErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.as_code()
    }

    // Common error constructors
    pub fn access_denied(resource: impl Into<String>) -> Self {
        Self::new(
            ToolErrorKind::AccessDenied,
            format!("Access denied: {}", resource.into()),
        )
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ToolErrorKind::NotFound,
            format!("Not found: {}", resource.into()),
        )
    }

    pub fn not_a_file(path: impl Into<String>) -> Self {
        Self::new(
            ToolErrorKind::NotAFile,
            format!("Not a file: {}", path.into()),
        )
    }

    pub fn too_large(size: u64, limit: u64) -> Self {
        Self::new(
            ToolErrorKind::TooLarge,
            format!("File too large ({} bytes, max {} bytes)", size, limit),
        )
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Timeout, operation)
    }

    pub fn tool_not_found(name: impl Into<String>) -> Self {
        Self::new(
            ToolErrorKind::ToolNotFound,
            format!("Tool '{}' not found", name.into()),
        )
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArguments, message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::ExecutionFailed, message)
    }

    pub fn parse_ambiguous(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::ParseAmbiguous, message)
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Result of a tool dispatch, carrying a value or an error.
///
/// Exactly one of [`output`](Self::output) and [`error`](Self::error) is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was dispatched
    pub tool_name: String,
    /// Whether the execution was successful
    pub success: bool,
    /// Result value (for successful execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    /// Error information (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Metadata about the execution
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured metadata about tool execution.
///
/// | Tool | `duration_ms` | `bytes` | `path` | `exit_code` | `match_count` | `truncated` |
/// |------|:---:|:---:|:---:|:---:|:---:|:---:|
/// | `read_file` | yes | yes | yes | - | - | yes |
/// | `list_directory` | yes | - | yes | - | yes | yes |
/// | `search_files` | yes | - | yes | - | yes | yes |
/// | `run_python` | yes | yes | - | yes | - | yes |
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Duration of execution in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Number of bytes processed/returned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    /// For file operations: the affected path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// For code execution: exit code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// For listings and searches: total number of entries found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_count: Option<usize>,
    /// Whether the output was cut short by a limit
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, output: impl Into<serde_json::Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: Some(output.into()),
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Add metadata to the result
    pub fn with_metadata(mut self, metadata: ToolResultMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Add duration metadata
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    /// Add path metadata
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.metadata.path = Some(path.into());
        self
    }

    /// Check if execution was successful
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get the result value
    pub fn output(&self) -> Option<&serde_json::Value> {
        self.output.as_ref()
    }

    /// Result value as display text; strings are shown without quotes
    pub fn output_text(&self) -> Option<String> {
        self.output.as_ref().map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Get the error
    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Kind of the failure, if any
    pub fn error_kind(&self) -> Option<ToolErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}
