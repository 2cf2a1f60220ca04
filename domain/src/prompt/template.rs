//! Prompt templates for the reasoning pipeline

use crate::reasoning::candidate::Candidate;
use crate::reasoning::critique::Critique;
use crate::reasoning::plan::Plan;
use crate::reasoning::refinement::TopCandidate;
use crate::scoring::rubric::{MAX_WEIGHTED_TOTAL, Rubric};

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Planning prompt: decide strategy, budget and research needs
    pub fn planner(query: &str) -> String {
        format!(
            r#"You are a strategic planner preparing a multi-path reasoning process.

Query:
{}

Analyze the query and produce a plan as a JSON object with these fields:
- "task": a precise restatement of what must be answered
- "reasoning_type": one of analytical, mathematical, logical, creative, comparative, causal
- "key_aspects": the aspects a complete answer must cover
- "domain_hints": relevant fields of knowledge
- "complexity_level": simple, moderate or complex
- "thinking_budget": number of reasoning steps each thinker should take (5-15)
- "success_criteria": what a good answer looks like
- "research_needed": true if up-to-date or factual lookups would help
- "research_steps": up to 5 objects {{"id", "type": "search", "query", "purpose"}}

Respond with the JSON object only."#,
            query
        )
    }

    /// Thinking prompt for one independently seeded path
    pub fn thinker(plan: &Plan, seed: u32, research_context: Option<&str>) -> String {
        let mut prompt = format!(
            r#"You are independent thinker #{} in a group of parallel reasoners.
Work through the task on your own and commit to an answer.

Task: {}
Reasoning type: {}
Key aspects: {}
Domain hints: {}
Complexity: {}
Success criteria: {}
Take up to {} reasoning steps.
"#,
            seed,
            plan.task,
            plan.reasoning_type,
            plan.key_aspects.join(", "),
            plan.domain_hints.join(", "),
            plan.complexity_level.as_str(),
            plan.success_criteria,
            plan.thinking_budget,
        );

        if let Some(context) = research_context.filter(|c| !c.trim().is_empty()) {
            prompt.push_str(&format!("\nResearch findings:\n{}\n", context));
        }

        prompt.push_str(
            r#"
Respond with a JSON object:
- "approach": the strategy you chose
- "thoughts": your reasoning steps, in order
- "answer": your final answer
- "confidence": low, medium or high
- "reasoning_quality": a short self-assessment
- "potential_issues": weaknesses or assumptions in your reasoning"#,
        );

        prompt
    }

    /// Critique prompt: score every candidate on the rubric table
    pub fn critic(query: &str, candidates: &[Candidate]) -> String {
        let mut prompt = format!(
            r#"You are a rigorous critic evaluating independent answers to the same query.

Query:
{}

Candidates:
"#,
            query
        );

        for candidate in candidates {
            prompt.push_str(&format!(
                "\n--- agent_id {} ---\nApproach: {}\nThoughts:\n",
                candidate.agent_id, candidate.approach
            ));
            for (i, thought) in candidate.thoughts.iter().enumerate() {
                prompt.push_str(&format!("{}. {}\n", i + 1, thought));
            }
            prompt.push_str(&format!(
                "Answer: {}\nSelf-reported confidence: {}\n",
                candidate.answer, candidate.confidence
            ));
        }

        prompt.push_str("\nScore each candidate from 0 to 10 on every rubric:\n");
        for rubric in Rubric::ALL {
            prompt.push_str(&format!(
                "- {} (weight {}): {}\n",
                rubric.as_str(),
                rubric.weight(),
                rubric.display_name()
            ));
        }

        prompt.push_str(
            r#"
Respond with a JSON object:
- "evaluations": one object per candidate with "agent_id", "rubric_scores" (rubric name -> {"score", "justification"}), "strengths", "weaknesses", "targeted_improvements", "detailed_feedback"
- "overall_assessment": a summary across all candidates
- "improvement_suggestions": general advice"#,
        );

        prompt
    }

    /// Refinement prompt: synthesize the top-ranked candidates
    pub fn refiner(query: &str, top: &[TopCandidate], critique: &Critique) -> String {
        let mut prompt = format!(
            r#"You are a synthesizer combining the best independent answers into one.

Query:
{}

Top-ranked candidates:
"#,
            query
        );

        for entry in top {
            let eval = &entry.evaluation;
            prompt.push_str(&format!(
                "\n--- Rank {} (agent_id {}, score {:.2}/{:.1}) ---\nApproach: {}\nAnswer: {}\nStrengths: {}\nWeaknesses: {}\nFeedback: {}\n",
                entry.rank,
                entry.agent_id(),
                entry.score(),
                MAX_WEIGHTED_TOTAL,
                entry.candidate.approach,
                entry.candidate.answer,
                eval.strengths.join("; "),
                eval.weaknesses.join("; "),
                eval.detailed_feedback,
            ));
        }

        prompt.push_str(&format!(
            "\nCritic's overall assessment: {}\n",
            critique.overall_assessment
        ));

        prompt.push_str(
            r#"
Respond with a JSON object:
- "final_answer": the synthesized answer
- "synthesis_approach": how you combined the candidates
- "sources_used": objects {"agent_id", "elements_borrowed", "contribution_weight": low|medium|high}
- "improvements_made": what the synthesis fixes
- "confidence_level": low, medium or high
- "reasoning_quality": a short self-assessment
- "completeness": how fully the query is addressed"#,
        );

        prompt
    }

    /// Meta-refinement prompt: elevate the refined answer
    pub fn meta_refiner(query: &str, refined_answer: &str) -> String {
        format!(
            r#"You are a meta-reasoner reviewing a synthesized answer from a higher vantage point.

Query:
{}

Synthesized answer:
{}

Look for deeper connections, hidden contradictions and second-order implications,
then produce an elevated answer. Respond with a JSON object:
- "meta_refined_answer": the elevated answer
- "synthesis_type": enhancement, confirmation, reframing or consolidation
- "elegance_score": 1-10
- "intellectual_depth": surface, moderate, deep or profound
- "key_insights_added": new insights
- "deeper_connections": objects {{"connection_type", "description", "significance"}}
- "potential_contradictions": objects {{"contradiction", "resolution", "confidence"}}
- "second_order_implications": consequences beyond the immediate answer
- "meta_confidence": low, medium or high
- "refinement_rationale": why the changes improve the answer"#,
            query, refined_answer
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reasoning::refinement::select_top_candidates;
    use serde_json::json;

    fn candidates() -> Vec<Candidate> {
        vec![
            Candidate::from_json(&json!({"approach": "direct", "answer": "Four"}), 0, 12),
            Candidate::from_json(&json!({"approach": "proof", "answer": "Exactly 4"}), 1, 12),
        ]
    }

    #[test]
    fn test_planner_contains_query() {
        let prompt = PromptTemplate::planner("What is Rust?");
        assert!(prompt.contains("What is Rust?"));
        assert!(prompt.contains("\"research_steps\""));
    }

    #[test]
    fn test_thinker_includes_plan_and_research() {
        let plan = Plan::fallback("What is 2+2?");
        let prompt = PromptTemplate::thinker(&plan, 3, Some("### arithmetic\n- fact"));
        assert!(prompt.contains("thinker #3"));
        assert!(prompt.contains("Analyze and answer: What is 2+2?"));
        assert!(prompt.contains("Take up to 10 reasoning steps"));
        assert!(prompt.contains("Research findings:\n### arithmetic"));

        let prompt = PromptTemplate::thinker(&plan, 0, Some("  "));
        assert!(!prompt.contains("Research findings"));
    }

    #[test]
    fn test_critic_lists_candidates_and_rubrics() {
        let prompt = PromptTemplate::critic("What is 2+2?", &candidates());
        assert!(prompt.contains("--- agent_id 0 ---"));
        assert!(prompt.contains("--- agent_id 1 ---"));
        assert!(prompt.contains("Exactly 4"));
        assert!(prompt.contains("logical_soundness (weight 0.4)"));
    }

    #[test]
    fn test_refiner_lists_top_candidates() {
        let cands = candidates();
        let critique = Critique::fallback(&cands);
        let top = select_top_candidates(&critique, &cands, 2);
        let prompt = PromptTemplate::refiner("What is 2+2?", &top, &critique);
        assert!(prompt.contains("Rank 1 (agent_id 0, score 6.00/12.0)"));
        assert!(prompt.contains("Rank 2 (agent_id 1"));
        assert!(prompt.contains("Fallback critique"));
    }

    #[test]
    fn test_meta_refiner_format() {
        let prompt = PromptTemplate::meta_refiner("Why?", "Because.");
        assert!(prompt.contains("Why?"));
        assert!(prompt.contains("Synthesized answer:\nBecause."));
    }
}
