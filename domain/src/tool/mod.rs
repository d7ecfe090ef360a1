//! Tool domain module
//!
//! This module defines the core abstractions of the **tool gateway**: how
//! untrusted model output becomes a validated, bounded tool invocation.
//!
//! # Overview
//!
//! ```text
//! model text ──▶ extract_tool_call ──▶ ToolCall ──▶ validate ──▶ ToolResult
//!                 (extraction)          (args)      (ToolSpec)    (value | ToolError)
//! ```
//!
//! # Key Types
//!
//! - [`ToolSpec`]: Immutable set of tool definitions
//! - [`ToolDefinition`]: Schema for a single tool (name, typed params)
//! - [`ToolCall`]: An invocation request with arguments and provenance
//! - [`ToolResult`]: Dispatch outcome with structured [`ToolResultMetadata`](value_objects::ToolResultMetadata)
//! - [`ToolError`] / [`ToolErrorKind`]: Failure taxonomy, carried as data
//! - [`ToolValidator`]: Pure domain trait for parameter validation
//! - [`extract_tool_call`]: Balanced-brace scanner for embedded calls
//!
//! # Architecture
//!
//! - **Domain** (this module): Pure definitions, no I/O
//! - **Application** (`ToolExecutorPort`): Port trait for tool dispatch
//! - **Infrastructure** (`ToolRegistry`): Path guard, bounded reader,
//!   sandboxed executor and the concrete tool handlers

pub mod entities;
pub mod extraction;
pub mod traits;
pub mod value_objects;

pub use entities::{ParamType, Provenance, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use extraction::{Extraction, NoCallReason, extract_tool_call};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolError, ToolErrorKind, ToolResult, ToolResultMetadata};
