use serde::{Deserialize, Serialize};

/// Stages of a pipeline run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Strategy and research needs for the query
    Planning,
    /// Optional external lookups requested by the plan
    Research,
    /// N independently seeded reasoning paths
    Thinking,
    /// Rubric scoring and ranking of all candidates
    Critique,
    /// Synthesis of the top-ranked candidates
    Refinement,
    /// Second-order elevation of the synthesis
    MetaRefinement,
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::Planning => "planning",
            Stage::Research => "research",
            Stage::Thinking => "thinking",
            Stage::Critique => "critique",
            Stage::Refinement => "refinement",
            Stage::MetaRefinement => "meta_refinement",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Stage::Planning => "Planning",
            Stage::Research => "Research",
            Stage::Thinking => "Parallel Thinking",
            Stage::Critique => "Critique",
            Stage::Refinement => "Refinement",
            Stage::MetaRefinement => "Meta-Refinement",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
