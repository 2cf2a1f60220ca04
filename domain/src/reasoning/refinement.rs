//! Refinement: synthesis of the top-ranked candidates.

use crate::normalize::coerce::{agent_id_from_value, confidence_from_value, string_list_or, text_or};
use crate::reasoning::candidate::Candidate;
use crate::reasoning::critique::{Critique, Evaluation};
use crate::reasoning::level::{Confidence, ContributionWeight, Level};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A ranked candidate joined with its evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCandidate {
    pub rank: usize,
    pub candidate: Candidate,
    pub evaluation: Evaluation,
}

impl TopCandidate {
    pub fn agent_id(&self) -> u32 {
        self.candidate.agent_id
    }

    pub fn score(&self) -> f64 {
        self.evaluation.weighted_total_score
    }
}

/// Join the best `top_k` ranking entries with their candidates.
///
/// `top_k` is clamped to `1..=candidates.len()`.
pub fn select_top_candidates(
    critique: &Critique,
    candidates: &[Candidate],
    top_k: usize,
) -> Vec<TopCandidate> {
    if candidates.is_empty() {
        return Vec::new();
    }
    let k = top_k.clamp(1, candidates.len());

    critique
        .ranking
        .iter()
        .filter_map(|entry| {
            let candidate = candidates.iter().find(|c| c.agent_id == entry.agent_id)?;
            let evaluation = critique.evaluation_for(entry.agent_id)?;
            Some(TopCandidate {
                rank: entry.rank,
                candidate: candidate.clone(),
                evaluation: evaluation.clone(),
            })
        })
        .take(k)
        .collect()
}

/// Candidate that contributed to the synthesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceUsed {
    pub agent_id: u32,
    pub elements_borrowed: Vec<String>,
    pub contribution_weight: ContributionWeight,
}

impl SourceUsed {
    fn from_json(value: &Value) -> Option<Self> {
        Some(Self {
            agent_id: agent_id_from_value(value.get("agent_id"))?,
            elements_borrowed: string_list_or(value.get("elements_borrowed"), &["general reasoning"]),
            contribution_weight: confidence_from_value(value.get("contribution_weight")),
        })
    }
}

/// Refiner output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementResult {
    pub final_answer: String,
    pub synthesis_approach: String,
    pub sources_used: Vec<SourceUsed>,
    pub improvements_made: Vec<String>,
    pub confidence_level: Confidence,
    pub reasoning_quality: String,
    pub completeness: String,
}

impl RefinementResult {
    /// Validate and enhance a normalized refiner response.
    pub fn from_json(value: &Value, top: &[TopCandidate]) -> Self {
        let final_answer = match value.get("final_answer") {
            Some(Value::String(s)) => s.clone(),
            None | Some(Value::Null) => simple_synthesis(top),
            Some(other) => {
                serde_json::to_string_pretty(other).unwrap_or_else(|_| simple_synthesis(top))
            }
        };

        let sources_used = match value.get("sources_used").and_then(Value::as_array) {
            Some(items) => items.iter().filter_map(SourceUsed::from_json).collect(),
            None => default_sources(top),
        };

        Self {
            final_answer,
            synthesis_approach: text_or(
                value.get("synthesis_approach"),
                "Combined insights from top-rated candidates",
            ),
            sources_used,
            improvements_made: string_list_or(
                value.get("improvements_made"),
                &["Synthesized multiple viewpoints"],
            ),
            confidence_level: confidence_from_value(value.get("confidence_level")),
            reasoning_quality: text_or(value.get("reasoning_quality"), "Standard synthesis quality"),
            completeness: text_or(value.get("completeness"), "Addresses main aspects of the query"),
        }
    }

    /// Result used when the refiner's output can't be recovered at all
    pub fn fallback(top: &[TopCandidate]) -> Self {
        Self {
            final_answer: simple_synthesis(top),
            synthesis_approach: "Fallback synthesis - detailed analysis unavailable".to_string(),
            sources_used: default_sources(top),
            improvements_made: vec!["Basic synthesis attempted".to_string()],
            confidence_level: Level::Medium,
            reasoning_quality: "Fallback quality - may need review".to_string(),
            completeness: "Basic completeness achieved".to_string(),
        }
    }
}

/// Deterministic synthesis: the top answer plus an agreement note.
pub fn simple_synthesis(top: &[TopCandidate]) -> String {
    let Some(best) = top.first() else {
        return "Unable to synthesize answer from candidates.".to_string();
    };

    let mut answer = best.candidate.answer.clone();
    if top.len() > 1 {
        answer.push_str(&format!(
            "\n\nAdditional perspectives from other candidates support this conclusion \
             with {} independent reasoning paths leading to similar results.",
            top.len()
        ));
    }
    answer
}

fn default_sources(top: &[TopCandidate]) -> Vec<SourceUsed> {
    top.iter()
        .take(2)
        .map(|t| SourceUsed {
            agent_id: t.agent_id(),
            elements_borrowed: vec!["reasoning approach".to_string()],
            contribution_weight: Level::Medium,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setup(n: u32) -> (Vec<Candidate>, Critique) {
        let candidates: Vec<Candidate> = (0..n)
            .map(|id| Candidate::from_json(&json!({"answer": format!("answer {id}")}), id, 12))
            .collect();
        let evaluations: Vec<Value> = (0..n)
            .map(|id| {
                json!({
                    "agent_id": id,
                    "rubric_scores": {"logical_soundness": {"score": id as f64}}
                })
            })
            .collect();
        let critique = Critique::from_json(&json!({"evaluations": evaluations}), &candidates);
        (candidates, critique)
    }

    #[test]
    fn test_top_k_clamped_to_candidate_count() {
        let (candidates, critique) = setup(3);
        let top = select_top_candidates(&critique, &candidates, 10);
        assert_eq!(top.len(), 3);
        let ids: Vec<u32> = top.iter().map(TopCandidate::agent_id).collect();
        assert_eq!(ids, vec![2, 1, 0]);
        assert_eq!(top[0].rank, 1);
    }

    #[test]
    fn test_top_k_minimum_one() {
        let (candidates, critique) = setup(3);
        assert_eq!(select_top_candidates(&critique, &candidates, 0).len(), 1);
        assert!(select_top_candidates(&critique, &[], 3).is_empty());
    }

    #[test]
    fn test_final_answer_text_taken_as_is() {
        let (candidates, critique) = setup(2);
        let top = select_top_candidates(&critique, &candidates, 2);
        let result = RefinementResult::from_json(&json!({"final_answer": "Synthesized"}), &top);
        assert_eq!(result.final_answer, "Synthesized");
    }

    #[test]
    fn test_structured_final_answer_serialized() {
        let (candidates, critique) = setup(1);
        let top = select_top_candidates(&critique, &candidates, 1);
        let result =
            RefinementResult::from_json(&json!({"final_answer": {"summary": "x"}}), &top);
        assert_eq!(result.final_answer, "{\n  \"summary\": \"x\"\n}");
    }

    #[test]
    fn test_missing_final_answer_uses_simple_synthesis() {
        let (candidates, critique) = setup(3);
        let top = select_top_candidates(&critique, &candidates, 2);
        let result = RefinementResult::from_json(&json!({}), &top);
        assert!(result.final_answer.starts_with("answer 2\n\n"));
        assert!(result.final_answer.contains("with 2 independent reasoning paths"));
        assert_eq!(result.synthesis_approach, "Combined insights from top-rated candidates");
        assert_eq!(result.sources_used.len(), 2);
        assert_eq!(result.sources_used[0].agent_id, 2);
        assert_eq!(result.confidence_level, Level::Medium);
    }

    #[test]
    fn test_single_candidate_synthesis_has_no_note() {
        let (candidates, critique) = setup(1);
        let top = select_top_candidates(&critique, &candidates, 3);
        assert_eq!(simple_synthesis(&top), "answer 0");
        assert_eq!(simple_synthesis(&[]), "Unable to synthesize answer from candidates.");
    }

    #[test]
    fn test_sources_used_validated() {
        let (candidates, critique) = setup(2);
        let top = select_top_candidates(&critique, &candidates, 2);
        let value = json!({
            "final_answer": "x",
            "sources_used": [
                {"agent_id": 1, "elements_borrowed": ["proof"], "contribution_weight": "HIGH"},
                {"agent_id": "unknown"}
            ]
        });
        let result = RefinementResult::from_json(&value, &top);
        assert_eq!(result.sources_used.len(), 1);
        assert_eq!(result.sources_used[0].contribution_weight, Level::High);
    }

    #[test]
    fn test_fallback() {
        let (candidates, critique) = setup(2);
        let top = select_top_candidates(&critique, &candidates, 2);
        let result = RefinementResult::fallback(&top);
        assert_eq!(result.synthesis_approach, "Fallback synthesis - detailed analysis unavailable");
        assert_eq!(result.improvements_made, vec!["Basic synthesis attempted"]);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(RefinementResult::from_json(&value, &top), result);
    }
}
