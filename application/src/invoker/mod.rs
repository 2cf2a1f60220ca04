//! Model invoker: one resilient call to the text-generation provider.
//!
//! Every agent goes through [`ModelInvoker::invoke`], which
//!
//! 1. clamps the output budget to [`MAX_OUTPUT_TOKENS`],
//! 2. races each attempt against a hard per-call timeout,
//! 3. treats blank output as a failure,
//! 4. retries failures according to a [`RetryPolicy`].
//!
//! Callers only ever see non-empty text or an [`InvokeError`].

pub mod retry;

pub use retry::{RetryPolicy, retry_all, retry_with_backoff};

use crate::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use deepthink_domain::core::string::preview;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Upper bound on requested output tokens.
///
/// Larger budgets make the provider more likely to stop at the limit and
/// return an empty body.
pub const MAX_OUTPUT_TOKENS: u32 = 8192;

/// Default hard timeout for a single attempt
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(180);

const LOG_PREVIEW_CHARS: usize = 200;

/// Failure of a model call after the retry policy gave up
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("Model call timed out after {attempts} attempt(s) of {}s each", timeout.as_secs())]
    Timeout { attempts: u32, timeout: Duration },

    #[error("Model call failed after {attempts} attempt(s): {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: GatewayError,
    },

    #[error("Model call rejected: {0}")]
    Rejected(#[source] GatewayError),
}

impl InvokeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, InvokeError::Timeout { .. })
    }
}

/// Shared, stateless wrapper around the gateway
pub struct ModelInvoker<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    policy: RetryPolicy,
    call_timeout: Duration,
}

impl<G: LlmGateway + 'static> Clone for ModelInvoker<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            policy: self.policy,
            call_timeout: self.call_timeout,
        }
    }
}

impl<G: LlmGateway + 'static> ModelInvoker<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            policy: RetryPolicy::default(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Call the model and return its non-empty text.
    pub async fn invoke(
        &self,
        prompt: &str,
        temperature: f32,
        max_output_tokens: u32,
        response_schema: Option<Value>,
    ) -> Result<String, InvokeError> {
        let max_output_tokens = if max_output_tokens > MAX_OUTPUT_TOKENS {
            warn!(
                requested = max_output_tokens,
                clamped_to = MAX_OUTPUT_TOKENS,
                "Clamping max_output_tokens"
            );
            MAX_OUTPUT_TOKENS
        } else {
            max_output_tokens
        };

        let request = GenerationRequest {
            prompt: prompt.to_string(),
            temperature,
            max_output_tokens,
            response_schema,
        };

        debug!(
            prompt_len = prompt.len(),
            temperature,
            max_output_tokens,
            "Invoking model"
        );

        let gateway = &self.gateway;
        let request = &request;
        let call_timeout = self.call_timeout;

        let result = retry_with_backoff(&self.policy, |attempt| async move {
            let text = match tokio::time::timeout(call_timeout, gateway.generate(request)).await {
                Ok(result) => result?,
                Err(_) => {
                    debug!(attempt, timeout_secs = call_timeout.as_secs(), "Model call timed out");
                    return Err(GatewayError::Timeout);
                }
            };

            if text.trim().is_empty() {
                return Err(GatewayError::EmptyResponse);
            }
            Ok(text)
        })
        .await;

        match result {
            Ok(text) => {
                debug!(
                    response_len = text.len(),
                    preview = %preview(&text, LOG_PREVIEW_CHARS),
                    "Model responded"
                );
                Ok(text)
            }
            Err(InvokeError::Exhausted { attempts, source }) if source.is_timeout() => {
                Err(InvokeError::Timeout {
                    attempts,
                    timeout: call_timeout,
                })
            }
            Err(e) => Err(e),
        }
    }
}
