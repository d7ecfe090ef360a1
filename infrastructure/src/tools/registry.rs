//! Tool Registry
//!
//! The [`ToolRegistry`] maps tool names to [`ToolHandler`]s and implements
//! [`ToolExecutorPort`]. It is assembled once through
//! [`ToolRegistryBuilder`] and is immutable afterwards, so it can be shared
//! between concurrent turns behind an `Arc`.
//!
//! # Usage
//!
//! ```ignore
//! use toolgate_infrastructure::tools::{ToolRegistry, arithmetic::AddNumbersTool};
//!
//! let registry = ToolRegistry::builder()
//!     .register(AddNumbersTool)
//!     .build()?;
//!
//! let call = ToolCall::new("add_numbers").with_arg("a", 2).with_arg("b", 3);
//! let result = registry.execute(&call).await;
//! assert_eq!(result.output(), Some(&json!(5)));
//! ```
//!
//! # Dispatch
//!
//! 1. Look up the handler by name (`ToolNotFound` if missing)
//! 2. Validate arguments against the definition (`InvalidArguments`)
//! 3. Invoke the handler, catching panics (`ExecutionFailed`)
//! 4. Stamp the elapsed time into the result metadata

use super::{ToolHandler, ToolOutput};
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use toolgate_application::ports::tool_executor::ToolExecutorPort;
use toolgate_domain::DomainError;
use toolgate_domain::tool::{
    entities::{ToolCall, ToolSpec},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolResult},
};
use tracing::{debug, info, warn};

/// Immutable name → handler map
pub struct ToolRegistry {
    tool_spec: ToolSpec,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
    validator: Box<dyn ToolValidator + Send + Sync>,
}

/// Collects handlers and checks for name clashes
pub struct ToolRegistryBuilder {
    handlers: Vec<Arc<dyn ToolHandler>>,
    validator: Box<dyn ToolValidator + Send + Sync>,
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    async fn dispatch(&self, call: &ToolCall) -> Result<ToolOutput, ToolError> {
        let (Some(handler), Some(definition)) = (
            self.handlers.get(&call.tool_name),
            self.tool_spec.get(&call.tool_name),
        ) else {
            return Err(ToolError::tool_not_found(&call.tool_name));
        };

        self.validator.validate(call, definition)?;

        match AssertUnwindSafe(handler.invoke(call)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => Err(ToolError::execution_failed(format!(
                "Tool panicked: {}",
                panic_message(panic.as_ref())
            ))),
        }
    }
}

impl ToolRegistryBuilder {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            validator: Box::new(DefaultToolValidator),
        }
    }

    pub fn register<H: ToolHandler + 'static>(self, handler: H) -> Self {
        self.register_arc(Arc::new(handler))
    }

    pub fn register_arc(mut self, handler: Arc<dyn ToolHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Replace the default argument validator
    pub fn with_validator<V: ToolValidator + Send + Sync + 'static>(mut self, validator: V) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// Freeze the registry. Two handlers with the same name are an error.
    pub fn build(self) -> Result<ToolRegistry, DomainError> {
        let mut tool_spec = ToolSpec::new();
        let mut handlers = HashMap::new();

        for handler in self.handlers {
            let definition = handler.definition();
            if handlers.contains_key(&definition.name) {
                return Err(DomainError::DuplicateTool(definition.name));
            }
            debug!(tool = %definition.name, "Tool registered");
            handlers.insert(definition.name.clone(), handler);
            tool_spec = tool_spec.register(definition);
        }

        Ok(ToolRegistry {
            tool_spec,
            handlers,
            validator: self.validator,
        })
    }
}

impl Default for ToolRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();
        info!(tool = %call.tool_name, "Dispatching tool call");
        debug!(tool = %call.tool_name, args = ?call.arguments, "Tool arguments");

        let result = match self.dispatch(call).await {
            Ok(output) => {
                ToolResult::success(&call.tool_name, output.value).with_metadata(output.metadata)
            }
            Err(error) => ToolResult::failure(&call.tool_name, error),
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        match result.error() {
            Some(error) => warn!(
                tool = %call.tool_name,
                code = error.code(),
                error = %error.message,
                duration_ms,
                "Tool call failed"
            ),
            None => debug!(tool = %call.tool_name, duration_ms, "Tool call succeeded"),
        }

        result.with_duration(duration_ms)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
