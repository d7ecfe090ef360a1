//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] producing the declaration
//! list printed by `toolgate tools` and embedded in model prompts.

use toolgate_application::ports::tool_schema::ToolSchemaPort;
use toolgate_domain::tool::entities::{ToolDefinition, ToolSpec};

/// Converts definitions to `{"name", "description", "input_schema"}` objects.
///
/// `path` parameters are declared as plain JSON strings.
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            properties.insert(
                param.name.clone(),
                serde_json::json!({
                    "type": param.param_type.json_type(),
                    "description": param.description,
                }),
            );

            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        serde_json::json!({
            "name": tool.name,
            "description": tool.description,
            "input_schema": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }

    fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value> {
        spec.sorted()
            .into_iter()
            .map(|t| self.tool_to_schema(t))
            .collect()
    }
}
