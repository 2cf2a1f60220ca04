//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod gemini;
mod output;
mod pipeline;
mod retry;
mod search;

pub use gemini::FileGeminiConfig;
pub use output::FileOutputConfig;
pub use pipeline::FilePipelineConfig;
pub use retry::FileRetryConfig;
pub use search::FileSearchConfig;

use deepthink_application::{PipelineParams, RetryPolicy};
use deepthink_domain::pipeline::request::{MAX_PATHS, MAX_TOP_K, MIN_PATHS};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Shortest pipeline deadline accepted from configuration
pub const MIN_PIPELINE_TIMEOUT_SECS: u64 = 30;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("pipeline.n_paths must be between 1 and 32 (got {0})")]
    InvalidPathCount(usize),

    #[error("pipeline.top_k must be between 1 and {max} (got {value})")]
    InvalidTopK { value: usize, max: usize },

    #[error("pipeline.timeout_seconds must be at least 30 (got {0})")]
    PipelineTimeoutTooShort(u64),

    #[error("gemini.timeout_seconds cannot be 0")]
    InvalidCallTimeout,

    #[error("gemini.model cannot be empty")]
    EmptyModelName,

    #[error("retry.max_attempts must be at least 1")]
    InvalidMaxAttempts,

    #[error("retry.base_delay_ms ({base_ms}ms) exceeds retry.max_delay_seconds ({max_secs}s)")]
    DelayOrder { base_ms: u64, max_secs: u64 },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Gemini provider settings
    pub gemini: FileGeminiConfig,
    /// Request defaults for a pipeline run
    pub pipeline: FilePipelineConfig,
    /// Retry policy for model calls
    pub retry: FileRetryConfig,
    /// Research search provider settings
    pub search: FileSearchConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let pipeline = &self.pipeline;

        if !(MIN_PATHS..=MAX_PATHS).contains(&pipeline.n_paths) {
            return Err(ConfigValidationError::InvalidPathCount(pipeline.n_paths));
        }

        let max_top_k = MAX_TOP_K.min(pipeline.n_paths);
        if pipeline.top_k == 0 || pipeline.top_k > max_top_k {
            return Err(ConfigValidationError::InvalidTopK {
                value: pipeline.top_k,
                max: max_top_k,
            });
        }

        if pipeline.timeout_seconds < MIN_PIPELINE_TIMEOUT_SECS {
            return Err(ConfigValidationError::PipelineTimeoutTooShort(
                pipeline.timeout_seconds,
            ));
        }

        if self.gemini.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidCallTimeout);
        }

        if self.gemini.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigValidationError::InvalidMaxAttempts);
        }

        if self.retry.base_delay_ms > self.retry.max_delay_seconds.saturating_mul(1000) {
            return Err(ConfigValidationError::DelayOrder {
                base_ms: self.retry.base_delay_ms,
                max_secs: self.retry.max_delay_seconds,
            });
        }

        Ok(())
    }

    /// Convert the file sections into application parameters
    pub fn pipeline_params(&self) -> PipelineParams {
        let retry = RetryPolicy::default()
            .with_max_attempts(self.retry.max_attempts)
            .with_base_delay(Duration::from_millis(self.retry.base_delay_ms))
            .with_max_delay(Duration::from_secs(self.retry.max_delay_seconds));

        PipelineParams::default()
            .with_retry(retry)
            .with_call_timeout(Duration::from_secs(self.gemini.timeout_seconds))
            .with_n_paths(self.pipeline.n_paths)
            .with_top_k(self.pipeline.top_k)
            .with_pipeline_timeout(Duration::from_secs(self.pipeline.timeout_seconds))
            .with_include_details(self.pipeline.include_details)
    }
}

/// Resolve an API key: an explicit non-empty value wins over the named
/// environment variable.
pub(crate) fn resolve_api_key(explicit: Option<&str>, env_var: &str) -> Option<String> {
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }
    std::env::var(env_var)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}
