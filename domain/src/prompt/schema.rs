//! Response schemas requested from the model for each stage.
//!
//! Written in plain JSON Schema vocabulary (`object`, `string`, ...).
//! Provider adapters translate them into their own dialect.

use crate::scoring::rubric::Rubric;
use serde_json::{Map, Value, json};

fn string() -> Value {
    json!({"type": "string"})
}

fn string_list() -> Value {
    json!({"type": "array", "items": {"type": "string"}})
}

fn level() -> Value {
    json!({"type": "string", "enum": ["low", "medium", "high"]})
}

pub fn plan_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "task": string(),
            "reasoning_type": string(),
            "key_aspects": string_list(),
            "domain_hints": string_list(),
            "complexity_level": {"type": "string", "enum": ["simple", "moderate", "complex"]},
            "thinking_budget": {"type": "integer"},
            "success_criteria": string(),
            "research_needed": {"type": "boolean"},
            "research_steps": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": string(),
                        "type": string(),
                        "query": string(),
                        "purpose": string()
                    },
                    "required": ["query"]
                }
            }
        },
        "required": ["task", "reasoning_type", "thinking_budget", "research_needed"]
    })
}

pub fn think_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "approach": string(),
            "thoughts": string_list(),
            "answer": string(),
            "confidence": level(),
            "reasoning_quality": string(),
            "potential_issues": string_list()
        },
        "required": ["approach", "thoughts", "answer", "confidence"]
    })
}

pub fn critique_schema() -> Value {
    let rubric_properties: Map<String, Value> = Rubric::ALL
        .iter()
        .map(|rubric| {
            (
                rubric.as_str().to_string(),
                json!({
                    "type": "object",
                    "properties": {
                        "score": {"type": "number"},
                        "justification": string()
                    },
                    "required": ["score"]
                }),
            )
        })
        .collect();

    json!({
        "type": "object",
        "properties": {
            "evaluations": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "agent_id": {"type": "integer"},
                        "rubric_scores": {"type": "object", "properties": rubric_properties},
                        "strengths": string_list(),
                        "weaknesses": string_list(),
                        "targeted_improvements": string_list(),
                        "detailed_feedback": string()
                    },
                    "required": ["agent_id", "rubric_scores"]
                }
            },
            "overall_assessment": string(),
            "improvement_suggestions": string_list()
        },
        "required": ["evaluations"]
    })
}

pub fn refine_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "final_answer": string(),
            "synthesis_approach": string(),
            "sources_used": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "agent_id": {"type": "integer"},
                        "elements_borrowed": string_list(),
                        "contribution_weight": level()
                    }
                }
            },
            "improvements_made": string_list(),
            "confidence_level": level(),
            "reasoning_quality": string(),
            "completeness": string()
        },
        "required": ["final_answer"]
    })
}

pub fn meta_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "meta_refined_answer": string(),
            "synthesis_type": {
                "type": "string",
                "enum": ["enhancement", "confirmation", "reframing", "consolidation"]
            },
            "elegance_score": {"type": "integer"},
            "intellectual_depth": {
                "type": "string",
                "enum": ["surface", "moderate", "deep", "profound"]
            },
            "key_insights_added": string_list(),
            "deeper_connections": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "connection_type": string(),
                        "description": string(),
                        "significance": level()
                    }
                }
            },
            "potential_contradictions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "contradiction": string(),
                        "resolution": string(),
                        "confidence": level()
                    }
                }
            },
            "second_order_implications": string_list(),
            "meta_confidence": level(),
            "refinement_rationale": string()
        },
        "required": ["meta_refined_answer"]
    })
}
