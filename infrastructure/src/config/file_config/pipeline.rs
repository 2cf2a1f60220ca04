//! Pipeline defaults from TOML (`[pipeline]` section)

use deepthink_domain::pipeline::request::{DEFAULT_PATHS, DEFAULT_TIMEOUT_SECS, DEFAULT_TOP_K};
use serde::{Deserialize, Serialize};

/// Request defaults; CLI flags override them per run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePipelineConfig {
    /// Number of parallel thinking paths
    pub n_paths: usize,
    /// Candidates carried into refinement
    pub top_k: usize,
    /// Deadline for the whole run in seconds
    pub timeout_seconds: u64,
    /// Attach every intermediate record to the result
    pub include_details: bool,
}

impl Default for FilePipelineConfig {
    fn default() -> Self {
        Self {
            n_paths: DEFAULT_PATHS,
            top_k: DEFAULT_TOP_K,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            include_details: false,
        }
    }
}
