//! Application layer for toolgate
//!
//! This crate contains the dispatch-loop use case and the port definitions
//! its adapters implement. It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    llm_gateway::{GatewayError, LlmGateway},
    tool_executor::ToolExecutorPort,
    tool_schema::ToolSchemaPort,
};
pub use use_cases::run_turn::{RunTurnError, RunTurnInput, RunTurnOutput, RunTurnUseCase};
