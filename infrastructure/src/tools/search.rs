//! Search tool: search_files

use super::{ToolHandler, ToolOutput, run_blocking};
use crate::sandbox::BoundedReader;
use async_trait::async_trait;
use std::sync::Arc;
use toolgate_domain::tool::{
    entities::{ParamType, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResultMetadata},
};

/// Tool name constant
pub const SEARCH_FILES: &str = "search_files";

/// Get the tool definition for search_files
pub fn search_files_definition() -> ToolDefinition {
    ToolDefinition::new(
        SEARCH_FILES,
        "Find files by glob pattern (e.g. '*.csv' or 'reports/**/*.md') below a directory",
    )
    .with_parameter(
        ToolParameter::new("directory", "Directory to search in", true).with_type(ParamType::Path),
    )
    .with_parameter(
        ToolParameter::new("pattern", "Relative glob pattern", true).with_type(ParamType::String),
    )
}

pub struct SearchFilesTool {
    reader: Arc<BoundedReader>,
}

impl SearchFilesTool {
    pub fn new(reader: Arc<BoundedReader>) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl ToolHandler for SearchFilesTool {
    fn definition(&self) -> ToolDefinition {
        search_files_definition()
    }

    async fn invoke(&self, call: &ToolCall) -> Result<ToolOutput, ToolError> {
        let directory = call.require_string("directory")?.to_string();
        let pattern = call.require_string("pattern")?.to_string();
        let reader = Arc::clone(&self.reader);

        let found = run_blocking(move || reader.search_files(&directory, &pattern)).await?;

        Ok(ToolOutput::new(found.render()).with_metadata(ToolResultMetadata {
            path: Some(found.directory.display().to_string()),
            match_count: Some(found.total),
            truncated: found.is_truncated(),
            ..Default::default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::PathGuard;
    use std::fs;
    use toolgate_domain::sandbox::ExecutionLimits;

    #[tokio::test]
    async fn test_search_files_tool_reports_true_count() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("data");
        fs::create_dir(&root).unwrap();
        for i in 0..100 {
            fs::write(root.join(format!("r{i:03}.csv")), "").unwrap();
        }
        let tool = SearchFilesTool::new(Arc::new(BoundedReader::new(
            Arc::new(PathGuard::new([&root])),
            Arc::new(ExecutionLimits::default()),
        )));

        let call = ToolCall::new(SEARCH_FILES)
            .with_arg("directory", root.to_str().unwrap())
            .with_arg("pattern", "*.csv");
        let output = tool.invoke(&call).await.unwrap();

        assert_eq!(output.metadata.match_count, Some(100));
        assert!(output.metadata.truncated);
        let text = output.value.as_str().unwrap();
        assert!(text.starts_with("Found 100 file(s) matching '*.csv':"));
        assert_eq!(text.lines().filter(|l| l.ends_with(".csv")).count(), 50);
    }
}
