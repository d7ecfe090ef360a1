//! Dispatch turn domain
//!
//! A turn takes one user message through the model, the extractor and, when
//! a call is present, the tool registry, ending in exactly one reply.

pub mod phase;
pub mod response;

pub use phase::{TurnPhase, TurnTrace};
pub use response::{render_backend_error, render_tool_response};
