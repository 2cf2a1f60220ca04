//! Research findings gathered before the thinking stage.

use crate::core::string::truncate;
use serde::{Deserialize, Serialize};

/// Max chars of each result's content included in the prompt context
const SUMMARY_CONTENT_CHARS: usize = 300;

/// One search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub content: String,
    pub url: String,
    pub score: f64,
}

/// Results for one research step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepFindings {
    pub step_id: String,
    pub query: String,
    pub purpose: String,
    pub results: Vec<SearchResult>,
}

/// Results for every research step of a plan, in step order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchFindings {
    pub steps: Vec<StepFindings>,
}

impl ResearchFindings {
    pub fn total_results(&self) -> usize {
        self.steps.iter().map(|s| s.results.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_results() == 0
    }

    /// Context block for thinker prompts.
    ///
    /// Steps that came back empty are skipped.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for step in self.steps.iter().filter(|s| !s.results.is_empty()) {
            out.push_str(&format!("### {} ({})\n", step.query, step.purpose));
            for result in &step.results {
                out.push_str(&format!(
                    "- {} [{:.2}]: {}\n",
                    result.title,
                    result.score,
                    truncate(&result.content, SUMMARY_CONTENT_CHARS)
                ));
                if !result.url.is_empty() {
                    out.push_str(&format!("  Source: {}\n", result.url));
                }
            }
            out.push('\n');
        }
        out.trim_end().to_string()
    }
}
