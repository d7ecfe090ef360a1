//! Ollama model backend
//!
//! Adapter for the [`LlmGateway`](toolgate_application::ports::llm_gateway::LlmGateway)
//! port over Ollama's non-streaming `/api/generate` endpoint.

mod gateway;

pub use gateway::OllamaGateway;
