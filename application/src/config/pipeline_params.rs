//! Pipeline parameters: invoker resilience and request defaults.
//!
//! [`PipelineParams`] groups the static parameters that control how
//! [`RunPipelineUseCase`](crate::use_cases::run_pipeline::RunPipelineUseCase)
//! talks to the provider, plus the values used when a caller doesn't
//! specify them.

use crate::invoker::{DEFAULT_CALL_TIMEOUT, RetryPolicy};
use deepthink_domain::pipeline::request::{
    DEFAULT_PATHS, DEFAULT_TIMEOUT_SECS, DEFAULT_TOP_K,
};
use deepthink_domain::{DomainError, ThinkRequest};
use std::time::Duration;

/// Pipeline control parameters.
///
/// | Field | Used by |
/// |-------|---------|
/// | `retry`, `call_timeout` | every model call |
/// | `n_paths`, `top_k`, `pipeline_timeout` | default [`ThinkRequest`] |
/// | `include_details` | result assembly |
#[derive(Debug, Clone)]
pub struct PipelineParams {
    pub retry: RetryPolicy,
    /// Hard timeout for a single model call attempt
    pub call_timeout: Duration,
    pub n_paths: usize,
    pub top_k: usize,
    /// Deadline for the whole run
    pub pipeline_timeout: Duration,
    pub include_details: bool,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
            n_paths: DEFAULT_PATHS,
            top_k: DEFAULT_TOP_K,
            pipeline_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            include_details: false,
        }
    }
}

impl PipelineParams {
    // ==================== Builder Methods ====================

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = n_paths;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_pipeline_timeout(mut self, timeout: Duration) -> Self {
        self.pipeline_timeout = timeout;
        self
    }

    pub fn with_include_details(mut self, include: bool) -> Self {
        self.include_details = include;
        self
    }

    /// Build a validated request for `query` from these defaults
    pub fn request(&self, query: impl Into<String>) -> Result<ThinkRequest, DomainError> {
        ThinkRequest::new(query, self.n_paths, self.top_k, self.pipeline_timeout)
    }
}
