//! Arithmetic tools: add_numbers, multiply_numbers

use super::{ToolHandler, ToolOutput};
use async_trait::async_trait;
use serde_json::{Number, Value};
use toolgate_domain::tool::{
    entities::{ParamType, ToolCall, ToolDefinition, ToolParameter},
    value_objects::ToolError,
};

/// Tool name constants
pub const ADD_NUMBERS: &str = "add_numbers";
pub const MULTIPLY_NUMBERS: &str = "multiply_numbers";

#[derive(Debug, Clone, Copy)]
enum Operation {
    Add,
    Multiply,
}

fn binary_definition(name: &str, description: &str) -> ToolDefinition {
    ToolDefinition::new(name, description)
        .with_parameter(ToolParameter::new("a", "First operand", true).with_type(ParamType::Number))
        .with_parameter(ToolParameter::new("b", "Second operand", true).with_type(ParamType::Number))
}

/// Get the tool definition for add_numbers
pub fn add_numbers_definition() -> ToolDefinition {
    binary_definition(ADD_NUMBERS, "Add two numbers")
}

/// Get the tool definition for multiply_numbers
pub fn multiply_numbers_definition() -> ToolDefinition {
    binary_definition(MULTIPLY_NUMBERS, "Multiply two numbers")
}

pub struct AddNumbersTool;

pub struct MultiplyNumbersTool;

#[async_trait]
impl ToolHandler for AddNumbersTool {
    fn definition(&self) -> ToolDefinition {
        add_numbers_definition()
    }

    async fn invoke(&self, call: &ToolCall) -> Result<ToolOutput, ToolError> {
        evaluate(call, Operation::Add).map(ToolOutput::new)
    }
}

#[async_trait]
impl ToolHandler for MultiplyNumbersTool {
    fn definition(&self) -> ToolDefinition {
        multiply_numbers_definition()
    }

    async fn invoke(&self, call: &ToolCall) -> Result<ToolOutput, ToolError> {
        evaluate(call, Operation::Multiply).map(ToolOutput::new)
    }
}

/// Integers stay integers (checked); anything else is computed as f64.
fn evaluate(call: &ToolCall, op: Operation) -> Result<Value, ToolError> {
    let a = call.require_number("a")?;
    let b = call.require_number("b")?;

    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        let result = match op {
            Operation::Add => x.checked_add(y),
            Operation::Multiply => x.checked_mul(y),
        };
        return result
            .map(Value::from)
            .ok_or_else(|| ToolError::execution_failed("Integer overflow"));
    }

    let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) else {
        return Err(ToolError::invalid_arguments("Operands must be numbers"));
    };
    let result = match op {
        Operation::Add => x + y,
        Operation::Multiply => x * y,
    };
    Number::from_f64(result)
        .map(Value::Number)
        .ok_or_else(|| ToolError::execution_failed("Result is not a finite number"))
}
