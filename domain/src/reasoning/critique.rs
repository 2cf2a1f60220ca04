//! Critique: rubric evaluations and ranking of all candidates.

use crate::normalize::coerce::{agent_id_from_value, string_list_or, text_or};
use crate::reasoning::candidate::Candidate;
use crate::scoring::ranking::rank_evaluations;
use crate::scoring::rubric::{Rubric, RubricScore, RubricScores, default_scores, weighted_total};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_SUGGESTIONS: &[&str] = &[
    "Consider more detailed reasoning",
    "Provide better evidence",
];

/// Rubric evaluation of one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub agent_id: u32,
    pub rubric_scores: RubricScores,
    /// Always recomputed from `rubric_scores`
    pub weighted_total_score: f64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub targeted_improvements: Vec<String>,
    pub detailed_feedback: String,
}

impl Evaluation {
    /// Validate one raw evaluation for a known candidate.
    ///
    /// Any total the model reported is discarded.
    pub fn from_json(value: &Value, agent_id: u32) -> Self {
        let raw_scores = value.get("rubric_scores");
        let rubric_scores: RubricScores = Rubric::ALL
            .iter()
            .map(|rubric| {
                let score =
                    RubricScore::from_value(raw_scores.and_then(|scores| scores.get(rubric.as_str())));
                (*rubric, score)
            })
            .collect();

        Self {
            agent_id,
            weighted_total_score: weighted_total(&rubric_scores),
            rubric_scores,
            strengths: string_list_or(value.get("strengths"), &["General reasoning"]),
            weaknesses: string_list_or(value.get("weaknesses"), &["Could be improved"]),
            targeted_improvements: string_list_or(value.get("targeted_improvements"), &[]),
            detailed_feedback: text_or(value.get("detailed_feedback"), "Standard evaluation"),
        }
    }

    /// Evaluation synthesized for a candidate the critic didn't cover
    pub fn default_for(agent_id: u32) -> Self {
        let rubric_scores = default_scores("Default score - evaluation unavailable");
        Self {
            agent_id,
            weighted_total_score: weighted_total(&rubric_scores),
            rubric_scores,
            strengths: vec!["Attempted the problem".to_string()],
            weaknesses: vec!["Limited evaluation available".to_string()],
            targeted_improvements: Vec::new(),
            detailed_feedback: "Default evaluation - original response may have been incomplete"
                .to_string(),
        }
    }

    /// Rubric with the highest score; the first one wins ties
    pub fn strongest_rubric(&self) -> Rubric {
        let mut best = Rubric::ALL[0];
        let mut best_score = f64::MIN;
        for rubric in Rubric::ALL {
            let score = self.rubric_scores.get(&rubric).map(|s| s.score).unwrap_or(0.0);
            if score > best_score {
                best = rubric;
                best_score = score;
            }
        }
        best
    }
}

/// Position of one candidate in the ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    pub rank: usize,
    pub agent_id: u32,
    pub weighted_total_score: f64,
    pub rationale: String,
}

/// Critic output covering every candidate exactly once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Critique {
    /// One per candidate, in candidate order
    pub evaluations: Vec<Evaluation>,
    /// Sorted by weighted total, descending
    pub ranking: Vec<RankEntry>,
    pub overall_assessment: String,
    pub improvement_suggestions: Vec<String>,
}

impl Critique {
    /// Validate and enhance a normalized critic response.
    ///
    /// Evaluations are matched to candidates by `agent_id`. Unknown ids are
    /// ignored and uncovered candidates get [`Evaluation::default_for`].
    pub fn from_json(value: &Value, candidates: &[Candidate]) -> Self {
        let raw_evaluations: Vec<&Value> = value
            .get("evaluations")
            .and_then(Value::as_array)
            .map(|items| items.iter().collect())
            .unwrap_or_default();

        let evaluations: Vec<Evaluation> = candidates
            .iter()
            .map(|candidate| {
                raw_evaluations
                    .iter()
                    .find(|raw| agent_id_from_value(raw.get("agent_id")) == Some(candidate.agent_id))
                    .map(|raw| Evaluation::from_json(raw, candidate.agent_id))
                    .unwrap_or_else(|| Evaluation::default_for(candidate.agent_id))
            })
            .collect();

        let ranking = rank_evaluations(&evaluations);

        Self {
            overall_assessment: text_or(
                value.get("overall_assessment"),
                &format!("Evaluated {} candidates with varying quality.", candidates.len()),
            ),
            improvement_suggestions: string_list_or(
                value.get("improvement_suggestions"),
                DEFAULT_SUGGESTIONS,
            ),
            evaluations,
            ranking,
        }
    }

    /// Critique used when the critic's output can't be recovered at all
    pub fn fallback(candidates: &[Candidate]) -> Self {
        let evaluations: Vec<Evaluation> = candidates
            .iter()
            .map(|c| Evaluation::default_for(c.agent_id))
            .collect();
        let ranking = rank_evaluations(&evaluations);

        Self {
            evaluations,
            ranking,
            overall_assessment: "Fallback critique - detailed evaluation unavailable".to_string(),
            improvement_suggestions: DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Evaluation for a given agent
    pub fn evaluation_for(&self, agent_id: u32) -> Option<&Evaluation> {
        self.evaluations.iter().find(|e| e.agent_id == agent_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::rubric::DEFAULT_RUBRIC_SCORE;
    use serde_json::json;

    fn candidates(ids: &[u32]) -> Vec<Candidate> {
        ids.iter()
            .map(|id| Candidate::from_json(&json!({"answer": format!("answer {id}")}), *id, 12))
            .collect()
    }

    fn scores(all: f64) -> Value {
        json!({
            "clarity_coherence": {"score": all, "justification": "c"},
            "logical_soundness": {"score": all, "justification": "l"},
            "completeness_depth": {"score": all, "justification": "d"},
            "originality_insight": {"score": all, "justification": "o"},
            "evidence_support": {"score": all, "justification": "e"}
        })
    }

    #[test]
    fn test_one_evaluation_per_candidate() {
        let cands = candidates(&[0, 2, 3]);
        let value = json!({
            "evaluations": [
                {"agent_id": 2, "rubric_scores": scores(9.0)},
                {"agent_id": 7, "rubric_scores": scores(10.0)},
                {"agent_id": "agent_0", "rubric_scores": scores(3.0)},
                {"agent_id": 2, "rubric_scores": scores(1.0)}
            ]
        });
        let critique = Critique::from_json(&value, &cands);

        let ids: Vec<u32> = critique.evaluations.iter().map(|e| e.agent_id).collect();
        assert_eq!(ids, vec![0, 2, 3]);

        let mut ranked: Vec<u32> = critique.ranking.iter().map(|r| r.agent_id).collect();
        ranked.sort();
        assert_eq!(ranked, vec![0, 2, 3]);

        // First matching evaluation wins
        assert!((critique.evaluation_for(2).unwrap().weighted_total_score - 10.8).abs() < 1e-9);
        // Candidate 3 was never evaluated
        assert_eq!(
            critique.evaluation_for(3).unwrap().strengths,
            vec!["Attempted the problem"]
        );
    }

    #[test]
    fn test_model_total_is_ignored() {
        let cands = candidates(&[0]);
        let value = json!({
            "evaluations": [
                {"agent_id": 0, "rubric_scores": scores(5.0), "weighted_total_score": 99.0}
            ]
        });
        let critique = Critique::from_json(&value, &cands);
        assert!((critique.evaluations[0].weighted_total_score - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_rubrics_default_to_five() {
        let cands = candidates(&[0]);
        let value = json!({
            "evaluations": [{"agent_id": 0, "rubric_scores": {"logical_soundness": 10}}]
        });
        let critique = Critique::from_json(&value, &cands);
        let eval = &critique.evaluations[0];
        assert_eq!(eval.rubric_scores[&Rubric::ClarityCoherence].score, DEFAULT_RUBRIC_SCORE);
        assert_eq!(eval.rubric_scores[&Rubric::LogicalSoundness].score, 10.0);
        assert!((eval.weighted_total_score - 8.0).abs() < 1e-9);
        assert_eq!(eval.strengths, vec!["General reasoning"]);
    }

    #[test]
    fn test_default_evaluation_total() {
        let eval = Evaluation::default_for(4);
        assert!((eval.weighted_total_score - 6.0).abs() < 1e-9);
        assert_eq!(eval.rubric_scores.len(), Rubric::ALL.len());
    }

    #[test]
    fn test_defaults_for_empty_response() {
        let cands = candidates(&[0, 1]);
        let critique = Critique::from_json(&json!({}), &cands);
        assert_eq!(critique.evaluations.len(), 2);
        assert_eq!(
            critique.overall_assessment,
            "Evaluated 2 candidates with varying quality."
        );
        assert_eq!(
            critique.improvement_suggestions,
            vec!["Consider more detailed reasoning", "Provide better evidence"]
        );
    }

    #[test]
    fn test_fallback_survives_validation() {
        let cands = candidates(&[0, 1, 2]);
        let fallback = Critique::fallback(&cands);
        let value = serde_json::to_value(&fallback).unwrap();
        assert_eq!(Critique::from_json(&value, &cands), fallback);
    }

    #[test]
    fn test_strongest_rubric() {
        let mut eval = Evaluation::default_for(0);
        assert_eq!(eval.strongest_rubric(), Rubric::ClarityCoherence);
        eval.rubric_scores
            .insert(Rubric::EvidenceSupport, RubricScore::new(9.0, "x"));
        assert_eq!(eval.strongest_rubric(), Rubric::EvidenceSupport);
    }
}
