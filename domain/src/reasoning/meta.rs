//! Meta-refinement: a second-order pass over the refined answer.

use crate::normalize::coerce::{confidence_from_value, number_from_value, string_list_or, text_or};
use crate::reasoning::level::{Confidence, Level};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MIN_ELEGANCE_SCORE: u8 = 1;
pub const MAX_ELEGANCE_SCORE: u8 = 10;
pub const DEFAULT_ELEGANCE_SCORE: u8 = 7;

/// How the meta pass changed the refined answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisType {
    Enhancement,
    #[default]
    Confirmation,
    Reframing,
    Consolidation,
}

impl SynthesisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SynthesisType::Enhancement => "enhancement",
            SynthesisType::Confirmation => "confirmation",
            SynthesisType::Reframing => "reframing",
            SynthesisType::Consolidation => "consolidation",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "enhancement" => Some(SynthesisType::Enhancement),
            "confirmation" => Some(SynthesisType::Confirmation),
            "reframing" => Some(SynthesisType::Reframing),
            "consolidation" => Some(SynthesisType::Consolidation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntellectualDepth {
    Surface,
    #[default]
    Moderate,
    Deep,
    Profound,
}

impl IntellectualDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntellectualDepth::Surface => "surface",
            IntellectualDepth::Moderate => "moderate",
            IntellectualDepth::Deep => "deep",
            IntellectualDepth::Profound => "profound",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "surface" => Some(IntellectualDepth::Surface),
            "moderate" => Some(IntellectualDepth::Moderate),
            "deep" => Some(IntellectualDepth::Deep),
            "profound" => Some(IntellectualDepth::Profound),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeeperConnection {
    pub connection_type: String,
    pub description: String,
    pub significance: Level,
}

impl DeeperConnection {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_object()?;
        Some(Self {
            connection_type: text_or(value.get("connection_type"), "conceptual"),
            description: text_or(value.get("description"), "Additional connection identified"),
            significance: confidence_from_value(value.get("significance")),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotentialContradiction {
    pub contradiction: String,
    pub resolution: String,
    pub confidence: Confidence,
}

impl PotentialContradiction {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_object()?;
        Some(Self {
            contradiction: text_or(value.get("contradiction"), "Potential inconsistency identified"),
            resolution: text_or(value.get("resolution"), "Further analysis recommended"),
            confidence: confidence_from_value(value.get("confidence")),
        })
    }
}

/// Meta-refiner output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaRefinementResult {
    pub meta_refined_answer: String,
    pub synthesis_type: SynthesisType,
    pub elegance_score: u8,
    pub intellectual_depth: IntellectualDepth,
    pub key_insights_added: Vec<String>,
    pub deeper_connections: Vec<DeeperConnection>,
    pub potential_contradictions: Vec<PotentialContradiction>,
    pub second_order_implications: Vec<String>,
    pub meta_confidence: Confidence,
    pub refinement_rationale: String,
}

impl MetaRefinementResult {
    /// Validate and enhance a normalized meta-refiner response.
    ///
    /// A blank answer keeps the refined answer it was meant to elevate.
    pub fn from_json(value: &Value, refined_answer: &str) -> Self {
        let elegance_score = number_from_value(value.get("elegance_score"))
            .map(|n| n.round().clamp(MIN_ELEGANCE_SCORE as f64, MAX_ELEGANCE_SCORE as f64) as u8)
            .unwrap_or(DEFAULT_ELEGANCE_SCORE);

        Self {
            meta_refined_answer: text_or(value.get("meta_refined_answer"), refined_answer),
            synthesis_type: value
                .get("synthesis_type")
                .and_then(Value::as_str)
                .and_then(SynthesisType::from_label)
                .unwrap_or_default(),
            elegance_score,
            intellectual_depth: value
                .get("intellectual_depth")
                .and_then(Value::as_str)
                .and_then(IntellectualDepth::from_label)
                .unwrap_or_default(),
            key_insights_added: string_list_or(value.get("key_insights_added"), &[]),
            deeper_connections: objects(value.get("deeper_connections"), DeeperConnection::from_json),
            potential_contradictions: objects(
                value.get("potential_contradictions"),
                PotentialContradiction::from_json,
            ),
            second_order_implications: string_list_or(value.get("second_order_implications"), &[]),
            meta_confidence: confidence_from_value(value.get("meta_confidence")),
            refinement_rationale: text_or(
                value.get("refinement_rationale"),
                "Meta-refinement provides additional perspective on the solution",
            ),
        }
    }

    /// Result used when the meta-refiner's output can't be recovered at all
    pub fn fallback(refined_answer: &str) -> Self {
        Self {
            meta_refined_answer: refined_answer.to_string(),
            synthesis_type: SynthesisType::Confirmation,
            elegance_score: DEFAULT_ELEGANCE_SCORE,
            intellectual_depth: IntellectualDepth::Moderate,
            key_insights_added: vec![
                "Meta-refinement process completed with fallback approach".to_string(),
            ],
            deeper_connections: Vec::new(),
            potential_contradictions: Vec::new(),
            second_order_implications: vec![
                "Further analysis may reveal additional insights".to_string(),
            ],
            meta_confidence: Level::Medium,
            refinement_rationale: "Fallback meta-refinement - detailed analysis unavailable"
                .to_string(),
        }
    }
}

fn objects<T>(value: Option<&Value>, parse: fn(&Value) -> Option<T>) -> Vec<T> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse).collect())
        .unwrap_or_default()
}
