//! Plan: the strategy shared by research and every thinking path.

use crate::normalize::coerce::{
    bool_from_value, integer_from_value, optional_text, string_list_or, text_or,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub const MIN_THINKING_BUDGET: u32 = 5;
pub const MAX_THINKING_BUDGET: u32 = 15;
pub const DEFAULT_THINKING_BUDGET: u32 = 10;
pub const MAX_RESEARCH_STEPS: usize = 5;

const DEFAULT_KEY_ASPECTS: &[&str] = &["main_problem"];
const DEFAULT_DOMAIN_HINTS: &[&str] = &["general"];
const DEFAULT_SUCCESS_CRITERIA: &str = "Clear, accurate, and well-reasoned answer";

/// Kind of reasoning the planner asks the thinkers to apply
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ReasoningType {
    #[default]
    Analytical,
    Mathematical,
    Logical,
    Creative,
    Comparative,
    Causal,
    /// Anything the model came up with that isn't a known kind
    Other(String),
}

impl ReasoningType {
    pub fn as_str(&self) -> &str {
        match self {
            ReasoningType::Analytical => "analytical",
            ReasoningType::Mathematical => "mathematical",
            ReasoningType::Logical => "logical",
            ReasoningType::Creative => "creative",
            ReasoningType::Comparative => "comparative",
            ReasoningType::Causal => "causal",
            ReasoningType::Other(s) => s,
        }
    }
}

impl std::fmt::Display for ReasoningType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReasoningType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.to_lowercase().as_str() {
            "analytical" => ReasoningType::Analytical,
            "mathematical" => ReasoningType::Mathematical,
            "logical" => ReasoningType::Logical,
            "creative" => ReasoningType::Creative,
            "comparative" => ReasoningType::Comparative,
            "causal" => ReasoningType::Causal,
            _ => ReasoningType::Other(trimmed.to_string()),
        })
    }
}

impl Serialize for ReasoningType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReasoningType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(kind) = s.parse();
        Ok(kind)
    }
}

/// Expected difficulty of the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Simple,
    #[default]
    Moderate,
    Complex,
}

impl ComplexityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityLevel::Simple => "simple",
            ComplexityLevel::Moderate => "moderate",
            ComplexityLevel::Complex => "complex",
        }
    }

    /// Substring match, case-insensitive; anything unrecognized is moderate
    pub fn from_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("simple") {
            ComplexityLevel::Simple
        } else if lower.contains("complex") {
            ComplexityLevel::Complex
        } else {
            ComplexityLevel::Moderate
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchStepType {
    #[default]
    Search,
}

/// One external lookup requested by the planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchStep {
    pub id: String,
    #[serde(rename = "type")]
    pub step_type: ResearchStepType,
    pub query: String,
    pub purpose: String,
}

impl ResearchStep {
    /// Validate one raw step. Returns `None` for anything that can't be run.
    pub fn from_json(value: &Value, index: usize) -> Option<Self> {
        if !value.is_object() {
            return None;
        }

        let query = optional_text(value.get("query"))?.trim().to_string();

        match value.get("type") {
            None | Some(Value::Null) => {}
            Some(Value::String(t)) if t.trim().eq_ignore_ascii_case("search") => {}
            Some(_) => return None,
        }

        Some(Self {
            id: text_or(value.get("id"), &format!("step_{}", index + 1)),
            step_type: ResearchStepType::Search,
            query,
            purpose: text_or(value.get("purpose"), "Gather supporting information"),
        })
    }
}

/// The planner's strategy for a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub task: String,
    pub reasoning_type: ReasoningType,
    pub key_aspects: Vec<String>,
    pub domain_hints: Vec<String>,
    pub complexity_level: ComplexityLevel,
    pub thinking_budget: u32,
    pub success_criteria: String,
    pub research_needed: bool,
    pub research_steps: Vec<ResearchStep>,
}

impl Plan {
    /// Validate and enhance a normalized planner response.
    pub fn from_json(value: &Value, query: &str) -> Self {
        let reasoning_type = optional_text(value.get("reasoning_type"))
            .map(|s| {
                let Ok(kind) = s.parse::<ReasoningType>();
                kind
            })
            .unwrap_or_default();

        let complexity_level = optional_text(value.get("complexity_level"))
            .map(|s| ComplexityLevel::from_label(&s))
            .unwrap_or_default();

        let thinking_budget = integer_from_value(value.get("thinking_budget"))
            .map(|n| n.clamp(MIN_THINKING_BUDGET as i64, MAX_THINKING_BUDGET as i64) as u32)
            .unwrap_or(DEFAULT_THINKING_BUDGET);

        let research_steps: Vec<ResearchStep> = value
            .get("research_steps")
            .and_then(Value::as_array)
            .map(|steps| {
                steps
                    .iter()
                    .enumerate()
                    .filter_map(|(i, step)| ResearchStep::from_json(step, i))
                    .take(MAX_RESEARCH_STEPS)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            task: text_or(value.get("task"), query),
            reasoning_type,
            key_aspects: string_list_or(value.get("key_aspects"), DEFAULT_KEY_ASPECTS),
            domain_hints: string_list_or(value.get("domain_hints"), DEFAULT_DOMAIN_HINTS),
            complexity_level,
            thinking_budget,
            success_criteria: text_or(value.get("success_criteria"), DEFAULT_SUCCESS_CRITERIA),
            research_needed: bool_from_value(value.get("research_needed")).unwrap_or(false),
            research_steps,
        }
    }

    /// Plan used when the planner's output can't be recovered at all.
    pub fn fallback(query: &str) -> Self {
        Self {
            task: format!("Analyze and answer: {}", query),
            reasoning_type: ReasoningType::Analytical,
            key_aspects: vec!["main_problem".to_string(), "solution_approach".to_string()],
            domain_hints: vec!["general".to_string()],
            complexity_level: ComplexityLevel::Moderate,
            thinking_budget: DEFAULT_THINKING_BUDGET,
            success_criteria: "Clear and accurate answer".to_string(),
            research_needed: false,
            research_steps: Vec::new(),
        }
    }

    /// Whether the research stage has anything to do
    pub fn needs_research(&self) -> bool {
        self.research_needed && !self.research_steps.is_empty()
    }

    /// Maximum number of thoughts a candidate may keep
    pub fn max_thoughts(&self) -> usize {
        self.thinking_budget as usize + 2
    }
}
