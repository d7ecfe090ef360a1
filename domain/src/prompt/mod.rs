//! Prompt domain
//!
//! Templates that tell the model which tools exist and how to call them.

pub mod agent;

pub use agent::AgentPromptTemplate;
