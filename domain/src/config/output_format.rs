//! Output format value object

use serde::{Deserialize, Serialize};

/// How a pipeline result is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Answer plus metadata and, when present, the detailed stage records
    #[default]
    Full,
    /// Only the final answer
    Answer,
    /// The whole result as JSON
    Json,
}
