//! Domain layer for toolgate
//!
//! This crate contains the pure logic of the tool gateway: tool definitions,
//! the failure taxonomy, argument validation, tool-call extraction from model
//! text, execution limits and the per-turn state machine.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Tool**: a named, schema-described operation that can be invoked on
//!   behalf of parsed model output
//! - **Tool-call extraction**: locating and decoding a structured invocation
//!   embedded in otherwise free-form text
//! - **Turn**: one user message taken through model, extractor and registry

pub mod core;
pub mod prompt;
pub mod sandbox;
pub mod tool;
pub mod turn;
pub mod util;

// Re-export commonly used types
pub use crate::core::error::DomainError;
pub use prompt::AgentPromptTemplate;
pub use sandbox::ExecutionLimits;
pub use tool::{
    entities::{ParamType, Provenance, ToolCall, ToolDefinition, ToolParameter, ToolSpec},
    extraction::{Extraction, NoCallReason, extract_tool_call},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolErrorKind, ToolResult, ToolResultMetadata},
};
pub use turn::{TurnPhase, TurnTrace, render_backend_error, render_tool_response};
