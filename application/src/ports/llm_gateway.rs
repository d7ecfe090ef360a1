//! LLM Gateway port
//!
//! Defines the interface for obtaining text from a model backend.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for LLM communication
///
/// One prompt in, one completed text out. Implementations (adapters) live
/// in the infrastructure layer; dropping the returned future must abandon
/// the request.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Name of the model this gateway talks to
    fn model(&self) -> &str;

    /// Send a prompt and wait for the complete, non-streamed reply
    async fn complete(&self, prompt: &str) -> Result<String, GatewayError>;
}
