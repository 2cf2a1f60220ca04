//! Three-step qualitative levels used across stage outputs.

use serde::{Deserialize, Serialize};

/// Low / medium / high rating.
///
/// Used for candidate confidence, refinement confidence, source
/// contribution weights and connection significance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    #[default]
    Medium,
    High,
}

/// Confidence of a candidate or synthesis
pub type Confidence = Level;

/// How much a source candidate contributed to a synthesis
pub type ContributionWeight = Level;

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }

    /// Lenient label parsing: substring match, `high` wins over `low`.
    pub fn from_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("high") {
            Level::High
        } else if lower.contains("low") {
            Level::Low
        } else {
            Level::Medium
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
