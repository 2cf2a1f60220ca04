//! Pipeline result and run metadata

use crate::pipeline::stage::Stage;
use crate::reasoning::candidate::Candidate;
use crate::reasoning::critique::Critique;
use crate::reasoning::level::Confidence;
use crate::reasoning::meta::MetaRefinementResult;
use crate::reasoning::plan::Plan;
use crate::reasoning::refinement::RefinementResult;
use crate::reasoning::research::ResearchFindings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Summary of how a run went
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineMetadata {
    pub n_paths: usize,
    pub candidates_generated: usize,
    pub candidates_failed: usize,
    pub top_k_used: usize,
    pub synthesis_approach: String,
    pub confidence_level: Confidence,
    /// Wall time, rounded to two decimals
    pub execution_time_seconds: f64,
    /// Stages that completed, in execution order
    pub pipeline_stages: Vec<Stage>,
    pub meta_refinement_applied: bool,
    pub research_performed: bool,
    /// Model responses that had to be replaced by a fallback record
    pub normalization_fallbacks: usize,
}

/// Every intermediate record of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedResults {
    pub plan: Plan,
    pub research: Option<ResearchFindings>,
    pub candidates: Vec<Candidate>,
    pub critique: Critique,
    pub refinement: RefinementResult,
    pub meta_refinement: Option<MetaRefinementResult>,
}

/// Final output of a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub query: String,
    pub answer: String,
    pub metadata: PipelineMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_results: Option<DetailedResults>,
    pub timestamp: DateTime<Utc>,
}

/// Seconds rounded to two decimals
pub fn round_seconds(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_seconds() {
        assert_eq!(round_seconds(Duration::from_millis(12_346)), 12.35);
        assert_eq!(round_seconds(Duration::from_millis(4)), 0.0);
    }

    #[test]
    fn test_metadata_stage_names() {
        let metadata = PipelineMetadata {
            n_paths: 3,
            candidates_generated: 3,
            candidates_failed: 0,
            top_k_used: 2,
            synthesis_approach: "x".to_string(),
            confidence_level: Confidence::High,
            execution_time_seconds: 1.5,
            pipeline_stages: vec![Stage::Planning, Stage::Thinking, Stage::MetaRefinement],
            meta_refinement_applied: true,
            research_performed: false,
            normalization_fallbacks: 0,
        };
        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(
            value["pipeline_stages"],
            serde_json::json!(["planning", "thinking", "meta_refinement"])
        );
        assert_eq!(value["confidence_level"], "high");
    }
}
