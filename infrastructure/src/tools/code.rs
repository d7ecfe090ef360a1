//! Code execution tool: run_python

use super::{ToolHandler, ToolOutput};
use crate::sandbox::SnippetRunner;
use async_trait::async_trait;
use std::sync::Arc;
use toolgate_domain::tool::{
    entities::{ParamType, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResultMetadata},
};

/// Tool name constant
pub const RUN_PYTHON: &str = "run_python";

/// Get the tool definition for run_python
pub fn run_python_definition() -> ToolDefinition {
    ToolDefinition::new(
        RUN_PYTHON,
        "Run a short Python snippet in a sandbox and return what it prints. \
         No network, no subprocesses, a few seconds of run time.",
    )
    .with_parameter(
        ToolParameter::new("code", "Python source to run", true).with_type(ParamType::String),
    )
}

pub struct RunPythonTool {
    runner: Arc<SnippetRunner>,
}

impl RunPythonTool {
    pub fn new(runner: Arc<SnippetRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl ToolHandler for RunPythonTool {
    fn definition(&self) -> ToolDefinition {
        run_python_definition()
    }

    async fn invoke(&self, call: &ToolCall) -> Result<ToolOutput, ToolError> {
        let code = call.require_string("code")?;
        if code.trim().is_empty() {
            return Err(ToolError::invalid_arguments("code must not be empty"));
        }

        let output = self.runner.run_snippet(code).await?;

        Ok(ToolOutput::new(output.text).with_metadata(ToolResultMetadata {
            bytes: Some(output.bytes),
            exit_code: output.exit_code,
            truncated: output.truncated,
            ..Default::default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::{PathGuard, SnippetScreen, locate_interpreter};
    use toolgate_domain::sandbox::ExecutionLimits;
    use toolgate_domain::tool::value_objects::ToolErrorKind;

    fn tool(dir: &tempfile::TempDir) -> Option<RunPythonTool> {
        let python = locate_interpreter("python3").ok()?;
        let runner = SnippetRunner::new(
            python,
            dir.path().join("scratch"),
            ExecutionLimits::default(),
            SnippetScreen::with_defaults().unwrap(),
            &PathGuard::default(),
        )
        .unwrap();
        Some(RunPythonTool::new(Arc::new(runner)))
    }

    #[tokio::test]
    async fn test_run_python() {
        let dir = tempfile::tempdir().unwrap();
        let Some(tool) = tool(&dir) else { return };

        let call = ToolCall::new(RUN_PYTHON).with_arg("code", "print(6 * 7)");
        let output = tool.invoke(&call).await.unwrap();

        assert_eq!(output.value, serde_json::json!("42"));
        assert_eq!(output.metadata.exit_code, Some(0));
    }

    #[tokio::test]
    async fn test_run_python_rejects_blank_code() {
        let dir = tempfile::tempdir().unwrap();
        let Some(tool) = tool(&dir) else { return };

        let call = ToolCall::new(RUN_PYTHON).with_arg("code", "   ");
        let err = tool.invoke(&call).await.unwrap_err();
        assert_eq!(err.kind, ToolErrorKind::InvalidArguments);
    }
}
