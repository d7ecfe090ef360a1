//! Ollama LLM Gateway implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use toolgate_application::ports::llm_gateway::{GatewayError, LlmGateway};
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// LLM Gateway for a local Ollama server
pub struct OllamaGateway {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaGateway {
    /// Create a gateway for `model` on the server at `base_url`.
    ///
    /// `timeout` bounds each whole request.
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Other(format!("Failed to build HTTP client: {}", e)))?;

        let endpoint = format!("{}/api/generate", base_url.trim_end_matches('/'));
        let model = model.into();
        info!(endpoint = %endpoint, model = %model, "OllamaGateway initialized");

        Ok(Self {
            client,
            endpoint,
            model,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LlmGateway for OllamaGateway {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        debug!(model = %self.model, prompt_bytes = prompt.len(), "Sending generate request");

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::InvalidResponse(e.to_string())
            }
        })?;

        debug!(model = %self.model, response_bytes = body.response.len(), "Model replied");
        Ok(body.response)
    }
}

fn map_request_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}
