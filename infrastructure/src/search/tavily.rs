//! Tavily web search

use crate::config::FileSearchConfig;
use async_trait::async_trait;
use deepthink_application::ports::search::{SearchError, SearchProvider};
use deepthink_domain::SearchResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Characters of page content kept per result
const MAX_CONTENT_CHARS: usize = 500;

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'static str,
    include_answer: bool,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    answer: Option<String>,
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    score: f64,
}

fn clip(text: &str) -> String {
    text.chars().take(MAX_CONTENT_CHARS).collect()
}

/// [`SearchProvider`] backed by the Tavily API
pub struct TavilySearch {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    max_results: usize,
}

impl TavilySearch {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        max_results: usize,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
            max_results,
        })
    }

    pub fn from_config(
        config: &FileSearchConfig,
        api_key: impl Into<String>,
    ) -> Result<Self, SearchError> {
        Self::new(
            api_key,
            config.base_url.clone(),
            config.max_results,
            Duration::from_secs(config.timeout_seconds),
        )
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let body = TavilyRequest {
            api_key: &self.api_key,
            query,
            search_depth: "advanced",
            include_answer: true,
            max_results: self.max_results,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SearchError::Request(format!(
                "Search API returned error: {}",
                response.status()
            )));
        }

        let data: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        let mut results = Vec::with_capacity(self.max_results + 1);

        if let Some(answer) = data.answer.as_deref()
            && !answer.trim().is_empty()
        {
            results.push(SearchResult {
                title: "Direct Answer".to_string(),
                content: clip(answer),
                url: String::new(),
                score: 1.0,
            });
        }

        results.extend(
            data.results
                .into_iter()
                .take(self.max_results)
                .map(|r| SearchResult {
                    title: r.title,
                    content: clip(&r.content),
                    url: r.url,
                    score: r.score,
                }),
        );

        debug!(query, results = results.len(), "Tavily search complete");
        Ok(results)
    }

    fn name(&self) -> &str {
        "tavily"
    }
}
