//! Tool schema conversion port.
//!
//! Separates "which tools exist" (domain) from "how they are declared to a
//! model" (infrastructure). Declarations are advisory for the model; the
//! registry's own validation stays authoritative.

use toolgate_domain::tool::entities::{ToolDefinition, ToolSpec};

/// Port for converting tool definitions to JSON Schema declarations.
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool definition to a JSON Schema declaration.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert all tools to a JSON Schema array (sorted by name).
    fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value>;
}
