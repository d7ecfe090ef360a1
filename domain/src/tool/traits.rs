//! Tool domain traits
//!
//! Contains pure domain logic traits for tool validation.
//! The async ToolExecutorPort is defined in the application layer (ports).

use super::entities::{ToolCall, ToolDefinition};
use super::value_objects::ToolError;

/// Validator for tool calls
///
/// This is a pure domain trait that validates tool calls
/// against their definitions without any I/O operations.
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), ToolError>;
}

/// Default implementation of ToolValidator
///
/// Rejects missing required parameters, unknown parameters and values of
/// the wrong JSON type. An argument set to `null` counts as absent.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), ToolError> {
        for param in definition.required_parameters() {
            if call.get(&param.name).is_none() {
                return Err(ToolError::invalid_arguments(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    param.name, definition.name
                )));
            }
        }

        // Sorted so the reported parameter is deterministic
        let mut names: Vec<&String> = call.arguments.keys().collect();
        names.sort();

        for arg_name in names {
            let Some(param) = definition.parameter(arg_name) else {
                return Err(ToolError::invalid_arguments(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, definition.name
                )));
            };

            if let Some(value) = call.get(arg_name)
                && !param.param_type.accepts(value)
            {
                return Err(ToolError::invalid_arguments(format!(
                    "Parameter '{}' for tool '{}' must be of type {}",
                    arg_name, definition.name, param.param_type
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{ParamType, ToolParameter};
    use crate::tool::value_objects::ToolErrorKind;
    use serde_json::json;

    fn definition() -> ToolDefinition {
        ToolDefinition::new("read_file", "Read a file")
            .with_parameter(ToolParameter::new("path", "Path", true).with_type(ParamType::Path))
            .with_parameter(
                ToolParameter::new("max_lines", "Line cap", false).with_type(ParamType::Integer),
            )
    }

    #[test]
    fn test_validator_missing_required() {
        let call = ToolCall::new("read_file");
        let err = DefaultToolValidator.validate(&call, &definition()).unwrap_err();
        assert_eq!(err.kind, ToolErrorKind::InvalidArguments);
        assert!(err.message.contains("Missing required parameter 'path'"));
    }

    #[test]
    fn test_validator_null_required_is_missing() {
        let call = ToolCall::new("read_file").with_arg("path", json!(null));
        let err = DefaultToolValidator.validate(&call, &definition()).unwrap_err();
        assert!(err.message.contains("Missing required parameter"));
    }

    #[test]
    fn test_validator_unknown_param() {
        let call = ToolCall::new("read_file")
            .with_arg("path", "/data/a")
            .with_arg("offset", 3);
        let err = DefaultToolValidator.validate(&call, &definition()).unwrap_err();
        assert!(err.message.contains("Unknown parameter 'offset'"));
    }

    #[test]
    fn test_validator_wrong_type() {
        let call = ToolCall::new("read_file")
            .with_arg("path", "/data/a")
            .with_arg("max_lines", "two");
        let err = DefaultToolValidator.validate(&call, &definition()).unwrap_err();
        assert!(err.message.contains("must be of type integer"));
    }

    #[test]
    fn test_validator_rejects_integer_beyond_i64() {
        let call = ToolCall::new("read_file")
            .with_arg("path", "/data/a")
            .with_arg("max_lines", json!(u64::MAX));
        let err = DefaultToolValidator.validate(&call, &definition()).unwrap_err();
        assert_eq!(err.kind, ToolErrorKind::InvalidArguments);
        assert!(err.message.contains("must be of type integer"));
    }

    #[test]
    fn test_validator_valid_call() {
        let call = ToolCall::new("read_file")
            .with_arg("path", "/data/a")
            .with_arg("max_lines", 2);
        assert!(DefaultToolValidator.validate(&call, &definition()).is_ok());

        let optional_null = ToolCall::new("read_file")
            .with_arg("path", "/data/a")
            .with_arg("max_lines", json!(null));
        assert!(DefaultToolValidator.validate(&optional_null, &definition()).is_ok());
    }
}
