//! User-facing text produced at the end of a turn.

use crate::tool::value_objects::ToolResult;

/// Render a dispatch outcome as the single reply for the turn.
///
/// Success reads `Tool '<name>' executed: <result>`; failure reads
/// `Tool '<name>' failed: [CODE] message`.
pub fn render_tool_response(result: &ToolResult) -> String {
    match (result.output_text(), result.error()) {
        (_, Some(error)) => format!("Tool '{}' failed: {}", result.tool_name, error),
        (Some(output), None) => format!("Tool '{}' executed: {}", result.tool_name, output),
        (None, None) => format!("Tool '{}' executed with no result", result.tool_name),
    }
}

/// Reply used when the model backend could not be reached
pub fn render_backend_error(reason: &str) -> String {
    format!("Model backend error: {}", reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::value_objects::ToolError;

    #[test]
    fn test_render_success() {
        let result = ToolResult::success("add_numbers", 5);
        assert_eq!(render_tool_response(&result), "Tool 'add_numbers' executed: 5");
    }

    #[test]
    fn test_render_text_success_is_unquoted() {
        let result = ToolResult::success("run_python", "hi");
        assert_eq!(render_tool_response(&result), "Tool 'run_python' executed: hi");
    }

    #[test]
    fn test_render_failure() {
        let result = ToolResult::failure("fly", ToolError::tool_not_found("fly"));
        assert_eq!(
            render_tool_response(&result),
            "Tool 'fly' failed: [TOOL_NOT_FOUND] Tool 'fly' not found"
        );
    }

    #[test]
    fn test_render_backend_error() {
        assert_eq!(
            render_backend_error("connection refused"),
            "Model backend error: connection refused"
        );
    }
}
