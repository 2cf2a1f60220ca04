//! LLM Gateway port
//!
//! Defines the interface for communicating with the text-generation provider.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
///
/// All of these are treated as transient by the default retry policy.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Empty response")]
    EmptyResponse,

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Timeout)
    }
}

/// One generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// JSON Schema the response should follow, if the provider supports it
    pub response_schema: Option<Value>,
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with the
/// provider. Implementations (adapters) live in the infrastructure layer.
/// An implementation may return empty text; the invoker treats that as a
/// failure.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Generate text for a single prompt
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError>;
}
