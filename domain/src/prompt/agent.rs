//! Prompt templates for the tool-calling agent

use crate::tool::entities::ToolSpec;

/// Templates for generating agent prompts
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// System prompt listing the tools and the embedded-call protocol
    pub fn agent_system(tool_spec: &ToolSpec) -> String {
        let tool_descriptions = tool_spec
            .sorted()
            .into_iter()
            .map(|t| {
                if t.parameters.is_empty() {
                    return format!("- {}: {}", t.name, t.description);
                }
                let params = t
                    .parameters
                    .iter()
                    .map(|p| {
                        let required = if p.required { ", required" } else { "" };
                        format!("    - {} ({}{}): {}", p.name, p.param_type, required, p.description)
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("- {}: {}\n{}", t.name, t.description, params)
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are a helpful AI assistant with access to the following tools:

{tool_descriptions}

When the user asks you to do something that requires a tool, respond with a JSON block like this:
{{"thought": "why you need this tool", "tool": "tool_name", "parameters": {{"param1": "value1"}}}}

Only call one tool per reply. Otherwise, just respond naturally."#
        )
    }

    /// Full prompt for one user turn
    pub fn user_turn(tool_spec: &ToolSpec, message: &str) -> String {
        format!("{}\n\nUser: {}", Self::agent_system(tool_spec), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{ParamType, ToolDefinition, ToolParameter};

    fn spec() -> ToolSpec {
        ToolSpec::new()
            .register(
                ToolDefinition::new("read_file", "Read a file")
                    .with_parameter(
                        ToolParameter::new("path", "File path", true).with_type(ParamType::Path),
                    ),
            )
            .register(ToolDefinition::new("get_current_time", "Current time"))
    }

    #[test]
    fn test_system_prompt_lists_tools_in_order() {
        let prompt = AgentPromptTemplate::agent_system(&spec());

        let time = prompt.find("- get_current_time: Current time").unwrap();
        let read = prompt.find("- read_file: Read a file").unwrap();
        assert!(time < read);
        assert!(prompt.contains("    - path (path, required): File path"));
        assert!(prompt.contains(r#""tool": "tool_name", "parameters""#));
    }

    #[test]
    fn test_user_turn() {
        let prompt = AgentPromptTemplate::user_turn(&spec(), "what time is it?");
        assert!(prompt.ends_with("\n\nUser: what time is it?"));
    }
}
