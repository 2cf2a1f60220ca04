//! Search provider port
//!
//! Used by the research stage to gather context before thinking.

use async_trait::async_trait;
use deepthink_domain::SearchResult;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search provider unavailable: {0}")]
    Unavailable(String),

    #[error("Search request failed: {0}")]
    Request(String),

    #[error("Invalid search response: {0}")]
    InvalidResponse(String),
}

/// External search
///
/// Every implementation returns the same record shape, so the research
/// stage behaves identically whether or not a real provider is configured.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search for `query`, best results first
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;

    /// Provider name for logs
    fn name(&self) -> &str;
}
