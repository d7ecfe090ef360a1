//! Tool implementations exposed to the model
//!
//! Each tool is a [`ToolHandler`]: a definition plus an async `invoke`.
//! Handlers are collected into a [`ToolRegistry`], which validates calls
//! against the definitions and implements `ToolExecutorPort`.
//!
//! ## Built-in tools
//!
//! - `file`: read_file, list_directory (bounded reader)
//! - `search`: search_files (bounded glob)
//! - `code`: run_python (sandboxed runner)
//! - `clock`: get_current_time
//! - `arithmetic`: add_numbers, multiply_numbers

pub mod arithmetic;
pub mod clock;
pub mod code;
pub mod file;
pub mod schema;
pub mod search;

mod registry;

pub use registry::{ToolRegistry, ToolRegistryBuilder};
pub use schema::JsonSchemaToolConverter;

use crate::sandbox::{BoundedReader, SnippetRunner};
use async_trait::async_trait;
use std::sync::Arc;
use toolgate_domain::DomainError;
use toolgate_domain::tool::{
    entities::{ToolCall, ToolDefinition},
    value_objects::{ToolError, ToolResultMetadata},
};

/// A single tool implementation
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Definition declared to the model and used for validation
    fn definition(&self) -> ToolDefinition;

    /// Run the tool. Arguments have already been validated against
    /// [`definition`](Self::definition).
    async fn invoke(&self, call: &ToolCall) -> Result<ToolOutput, ToolError>;
}

/// Successful handler output
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub value: serde_json::Value,
    pub metadata: ToolResultMetadata,
}

impl ToolOutput {
    pub fn new(value: impl Into<serde_json::Value>) -> Self {
        Self {
            value: value.into(),
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: ToolResultMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Build the registry with every built-in tool.
///
/// `run_python` is only registered when a runner is available.
pub fn default_registry(
    reader: Arc<BoundedReader>,
    runner: Option<Arc<SnippetRunner>>,
) -> Result<ToolRegistry, DomainError> {
    let mut builder = ToolRegistry::builder()
        .register(file::ReadFileTool::new(reader.clone()))
        .register(file::ListDirectoryTool::new(reader.clone()))
        .register(search::SearchFilesTool::new(reader))
        .register(clock::CurrentTimeTool)
        .register(arithmetic::AddNumbersTool)
        .register(arithmetic::MultiplyNumbersTool);

    if let Some(runner) = runner {
        builder = builder.register(code::RunPythonTool::new(runner));
    }

    builder.build()
}

/// Run blocking filesystem work off the async workers
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, ToolError>
where
    F: FnOnce() -> Result<T, ToolError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ToolError::execution_failed(format!("Blocking task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::PathGuard;
    use toolgate_application::ports::tool_executor::ToolExecutorPort;
    use toolgate_domain::sandbox::ExecutionLimits;

    #[test]
    fn test_default_registry_without_runner() {
        let reader = Arc::new(BoundedReader::new(
            Arc::new(PathGuard::default()),
            Arc::new(ExecutionLimits::default()),
        ));
        let registry = default_registry(reader, None).unwrap();

        assert_eq!(
            registry.available_tools(),
            vec![
                "add_numbers",
                "get_current_time",
                "list_directory",
                "multiply_numbers",
                "read_file",
                "search_files",
            ]
        );
        assert!(!registry.has_tool(code::RUN_PYTHON));
    }
}
