//! File tools: read_file, list_directory

use super::{ToolHandler, ToolOutput, run_blocking};
use crate::sandbox::BoundedReader;
use async_trait::async_trait;
use std::sync::Arc;
use toolgate_domain::tool::{
    entities::{ParamType, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResultMetadata},
};

/// Tool name constants
pub const READ_FILE: &str = "read_file";
pub const LIST_DIRECTORY: &str = "list_directory";

/// Get the tool definition for read_file
pub fn read_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        READ_FILE,
        "Read the contents of a text file inside the allowed directories",
    )
    .with_parameter(
        ToolParameter::new("path", "Absolute path of the file to read", true)
            .with_type(ParamType::Path),
    )
    .with_parameter(
        ToolParameter::new("max_lines", "Only return the first N lines", false)
            .with_type(ParamType::Integer),
    )
}

/// Get the tool definition for list_directory
pub fn list_directory_definition() -> ToolDefinition {
    ToolDefinition::new(
        LIST_DIRECTORY,
        "List the files and subdirectories of a directory",
    )
    .with_parameter(
        ToolParameter::new("path", "Absolute path of the directory to list", true)
            .with_type(ParamType::Path),
    )
}

pub struct ReadFileTool {
    reader: Arc<BoundedReader>,
}

impl ReadFileTool {
    pub fn new(reader: Arc<BoundedReader>) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl ToolHandler for ReadFileTool {
    fn definition(&self) -> ToolDefinition {
        read_file_definition()
    }

    async fn invoke(&self, call: &ToolCall) -> Result<ToolOutput, ToolError> {
        let path = call.require_string("path")?.to_string();
        let max_lines = call.get_i64("max_lines");
        let reader = Arc::clone(&self.reader);

        let content = run_blocking(move || reader.read_file(&path, max_lines)).await?;

        Ok(ToolOutput::new(content.render()).with_metadata(ToolResultMetadata {
            bytes: Some(content.bytes as usize),
            path: Some(content.path.display().to_string()),
            truncated: content.is_truncated(),
            ..Default::default()
        }))
    }
}

pub struct ListDirectoryTool {
    reader: Arc<BoundedReader>,
}

impl ListDirectoryTool {
    pub fn new(reader: Arc<BoundedReader>) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl ToolHandler for ListDirectoryTool {
    fn definition(&self) -> ToolDefinition {
        list_directory_definition()
    }

    async fn invoke(&self, call: &ToolCall) -> Result<ToolOutput, ToolError> {
        let path = call.require_string("path")?.to_string();
        let reader = Arc::clone(&self.reader);

        let listing = run_blocking(move || reader.list_directory(&path)).await?;

        Ok(ToolOutput::new(listing.render()).with_metadata(ToolResultMetadata {
            path: Some(listing.path.display().to_string()),
            match_count: Some(listing.total),
            truncated: listing.is_truncated(),
            ..Default::default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::PathGuard;
    use crate::tools::ToolRegistry;
    use std::fs;
    use toolgate_application::ports::tool_executor::ToolExecutorPort;
    use toolgate_domain::sandbox::ExecutionLimits;
    use toolgate_domain::tool::value_objects::ToolErrorKind;

    fn setup() -> (tempfile::TempDir, std::path::PathBuf, ToolRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("data");
        fs::create_dir(&root).unwrap();
        let reader = Arc::new(BoundedReader::new(
            Arc::new(PathGuard::new([&root])),
            Arc::new(ExecutionLimits::default()),
        ));
        let registry = ToolRegistry::builder()
            .register(ReadFileTool::new(reader.clone()))
            .register(ListDirectoryTool::new(reader))
            .build()
            .unwrap();
        let root = root.canonicalize().unwrap();
        (dir, root, registry)
    }

    #[tokio::test]
    async fn test_read_file_tool() {
        let (_dir, root, registry) = setup();
        let file = root.join("notes.txt");
        fs::write(&file, "a\nb\nc\nd\ne\n").unwrap();

        let call = ToolCall::new(READ_FILE)
            .with_arg("path", file.to_str().unwrap())
            .with_arg("max_lines", 2);
        let result = registry.execute(&call).await;

        assert!(result.is_success());
        assert_eq!(
            result.output_text().unwrap(),
            "a\nb\n... (3 more lines truncated)"
        );
        assert!(result.metadata.truncated);
        assert_eq!(result.metadata.bytes, Some(10));
    }

    #[tokio::test]
    async fn test_read_file_tool_denied() {
        let (_dir, _root, registry) = setup();
        let call = ToolCall::new(READ_FILE).with_arg("path", "/etc/passwd");
        let result = registry.execute(&call).await;
        assert_eq!(result.error_kind(), Some(ToolErrorKind::AccessDenied));
    }

    #[tokio::test]
    async fn test_read_file_tool_rejects_fractional_max_lines() {
        let (_dir, root, registry) = setup();
        let call = ToolCall::new(READ_FILE)
            .with_arg("path", root.join("x").to_str().unwrap())
            .with_arg("max_lines", 1.5);
        let result = registry.execute(&call).await;
        assert_eq!(result.error_kind(), Some(ToolErrorKind::InvalidArguments));
    }

    #[tokio::test]
    async fn test_list_directory_tool() {
        let (_dir, root, registry) = setup();
        fs::write(root.join("a.txt"), "abc").unwrap();

        let call = ToolCall::new(LIST_DIRECTORY).with_arg("path", root.to_str().unwrap());
        let result = registry.execute(&call).await;

        assert!(result.is_success());
        assert!(result.output_text().unwrap().contains("📄 a.txt (3 bytes)"));
        assert_eq!(result.metadata.match_count, Some(1));
    }
}
