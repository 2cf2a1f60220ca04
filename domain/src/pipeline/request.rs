//! Validated pipeline request

use crate::core::error::DomainError;
use crate::core::query::Query;
use std::time::Duration;

pub const MIN_PATHS: usize = 1;
pub const MAX_PATHS: usize = 32;
pub const MAX_TOP_K: usize = 10;

pub const DEFAULT_PATHS: usize = 8;
pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// A request to run the pipeline once (Value Object)
///
/// Construction rejects malformed input. A `top_k` larger than `n_paths`
/// is not an error: it is lowered to `n_paths` and the original value is
/// kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThinkRequest {
    query: Query,
    n_paths: usize,
    top_k: usize,
    requested_top_k: usize,
    timeout: Duration,
}

impl ThinkRequest {
    pub fn new(
        query: impl Into<String>,
        n_paths: usize,
        top_k: usize,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let query = Query::try_new(query)?;

        if !(MIN_PATHS..=MAX_PATHS).contains(&n_paths) {
            return Err(DomainError::InvalidPathCount {
                value: n_paths,
                min: MIN_PATHS,
                max: MAX_PATHS,
            });
        }

        if !(1..=MAX_TOP_K).contains(&top_k) {
            return Err(DomainError::InvalidTopK {
                value: top_k,
                max: MAX_TOP_K,
            });
        }

        if timeout.is_zero() {
            return Err(DomainError::InvalidTimeout);
        }

        Ok(Self {
            query,
            n_paths,
            top_k: top_k.min(n_paths),
            requested_top_k: top_k,
            timeout,
        })
    }

    /// Request with default path count, top_k and timeout
    pub fn with_defaults(query: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(
            query,
            DEFAULT_PATHS,
            DEFAULT_TOP_K,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Effective top_k, never above `n_paths`
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn requested_top_k(&self) -> usize {
        self.requested_top_k
    }

    pub fn top_k_adjusted(&self) -> bool {
        self.top_k != self.requested_top_k
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
