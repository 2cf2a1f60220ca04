//! Offline search with canned, keyword-themed results

use async_trait::async_trait;
use deepthink_application::ports::search::{SearchError, SearchProvider};
use deepthink_domain::SearchResult;

const PHYSICS_KEYWORDS: [&str; 3] = ["quantum", "physics", "computing"];
const AI_KEYWORDS: [&str; 3] = ["ai", "machine learning", "artificial intelligence"];

fn result(title: &str, content: &str, url: &str, score: f64) -> SearchResult {
    SearchResult {
        title: title.to_string(),
        content: content.to_string(),
        url: url.to_string(),
        score,
    }
}

/// [`SearchProvider`] that never touches the network
#[derive(Debug, Default)]
pub struct SimulatedSearch;

impl SimulatedSearch {
    pub fn new() -> Self {
        Self
    }

    fn results_for(query: &str) -> Vec<SearchResult> {
        let lowered = query.to_lowercase();

        if PHYSICS_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            vec![
                result(
                    "Quantum Computing Advances",
                    "Recent developments in quantum computing show promising results for solving complex computational problems...",
                    "https://example.com/quantum-computing",
                    0.9,
                ),
                result(
                    "Quantum Physics Research",
                    "Current research in quantum physics explores fundamental properties of matter and energy...",
                    "https://example.com/quantum-physics",
                    0.8,
                ),
            ]
        } else if AI_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            vec![
                result(
                    "AI Research Trends",
                    "Latest trends in artificial intelligence show significant progress in language models and reasoning systems...",
                    "https://example.com/ai-trends",
                    0.9,
                ),
                result(
                    "Machine Learning Applications",
                    "Machine learning applications span across various industries including healthcare, finance, and technology...",
                    "https://example.com/ml-applications",
                    0.8,
                ),
            ]
        } else {
            vec![result(
                &format!("Research on: {}", query),
                &format!(
                    "Simulated research content related to '{}'. Configure a search API key for real web results.",
                    query
                ),
                "https://example.com/simulated-research",
                0.7,
            )]
        }
    }
}

#[async_trait]
impl SearchProvider for SimulatedSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        Ok(Self::results_for(query))
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
