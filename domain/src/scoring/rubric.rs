//! Evaluation rubrics and their fixed weights.

use crate::normalize::coerce::{number_from_value, text_or};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const MIN_RUBRIC_SCORE: f64 = 0.0;
pub const MAX_RUBRIC_SCORE: f64 = 10.0;
pub const DEFAULT_RUBRIC_SCORE: f64 = 5.0;

/// Highest reachable weighted total.
///
/// The weights sum to 1.2, so totals run from 0 to 12 rather than 0 to 10.
pub const MAX_WEIGHTED_TOTAL: f64 = 12.0;

/// A named scoring dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rubric {
    ClarityCoherence,
    LogicalSoundness,
    CompletenessDepth,
    OriginalityInsight,
    EvidenceSupport,
}

impl Rubric {
    pub const ALL: [Rubric; 5] = [
        Rubric::ClarityCoherence,
        Rubric::LogicalSoundness,
        Rubric::CompletenessDepth,
        Rubric::OriginalityInsight,
        Rubric::EvidenceSupport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rubric::ClarityCoherence => "clarity_coherence",
            Rubric::LogicalSoundness => "logical_soundness",
            Rubric::CompletenessDepth => "completeness_depth",
            Rubric::OriginalityInsight => "originality_insight",
            Rubric::EvidenceSupport => "evidence_support",
        }
    }

    /// Human-readable name for rationales and console output
    pub fn display_name(&self) -> &'static str {
        match self {
            Rubric::ClarityCoherence => "clarity and coherence",
            Rubric::LogicalSoundness => "logical soundness",
            Rubric::CompletenessDepth => "completeness and depth",
            Rubric::OriginalityInsight => "originality and insight",
            Rubric::EvidenceSupport => "evidence and support",
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            Rubric::ClarityCoherence => 0.2,
            Rubric::LogicalSoundness => 0.4,
            Rubric::CompletenessDepth => 0.3,
            Rubric::OriginalityInsight => 0.1,
            Rubric::EvidenceSupport => 0.2,
        }
    }
}

impl std::fmt::Display for Rubric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Score on one rubric, clamped to `[0, 10]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricScore {
    pub score: f64,
    pub justification: String,
}

impl RubricScore {
    pub fn new(score: f64, justification: impl Into<String>) -> Self {
        Self {
            score: score.clamp(MIN_RUBRIC_SCORE, MAX_RUBRIC_SCORE),
            justification: justification.into(),
        }
    }

    /// Accepts `{"score": .., "justification": ..}` or a bare number.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Object(map)) => Self::new(
                number_from_value(map.get("score")).unwrap_or(DEFAULT_RUBRIC_SCORE),
                text_or(map.get("justification"), "No justification provided"),
            ),
            other => Self::new(
                number_from_value(other).unwrap_or(DEFAULT_RUBRIC_SCORE),
                "No justification provided",
            ),
        }
    }
}

/// Scores for every rubric
pub type RubricScores = BTreeMap<Rubric, RubricScore>;

/// Σ(score × weight) over the full rubric table.
///
/// A rubric missing from `scores` counts as [`DEFAULT_RUBRIC_SCORE`].
pub fn weighted_total(scores: &RubricScores) -> f64 {
    Rubric::ALL
        .iter()
        .map(|rubric| {
            let score = scores
                .get(rubric)
                .map(|s| s.score)
                .unwrap_or(DEFAULT_RUBRIC_SCORE);
            score * rubric.weight()
        })
        .sum()
}

/// Every rubric at the default score
pub fn default_scores(justification: &str) -> RubricScores {
    Rubric::ALL
        .iter()
        .map(|rubric| (*rubric, RubricScore::new(DEFAULT_RUBRIC_SCORE, justification)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_weights_sum_to_max_total() {
        let sum: f64 = Rubric::ALL.iter().map(Rubric::weight).sum();
        assert!((sum * MAX_RUBRIC_SCORE - MAX_WEIGHTED_TOTAL).abs() < 1e-9);
    }

    #[test]
    fn test_default_total_is_six() {
        let scores = default_scores("x");
        assert!((weighted_total(&scores) - 6.0).abs() < 1e-9);
        assert!((weighted_total(&RubricScores::new()) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_total() {
        let mut scores = default_scores("x");
        scores.insert(Rubric::LogicalSoundness, RubricScore::new(10.0, "y"));
        // 6.0 - 5*0.4 + 10*0.4
        assert!((weighted_total(&scores) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_rubric_score_from_value() {
        let s = RubricScore::from_value(Some(&json!({"score": 14, "justification": "great"})));
        assert_eq!(s.score, 10.0);
        assert_eq!(s.justification, "great");

        let s = RubricScore::from_value(Some(&json!(-3)));
        assert_eq!(s.score, 0.0);

        let s = RubricScore::from_value(Some(&json!({"score": "n/a"})));
        assert_eq!(s.score, DEFAULT_RUBRIC_SCORE);
        assert_eq!(s.justification, "No justification provided");

        let s = RubricScore::from_value(None);
        assert_eq!(s.score, DEFAULT_RUBRIC_SCORE);
    }

    #[test]
    fn test_rubric_keys_serialize_snake_case() {
        let value = serde_json::to_value(default_scores("x")).unwrap();
        assert!(value.get("logical_soundness").is_some());
        assert!(value.get("evidence_support").is_some());
    }
}
