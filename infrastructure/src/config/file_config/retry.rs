//! Retry configuration from TOML (`[retry]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    /// Total attempts per model call, including the first
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each further retry
    pub base_delay_ms: u64,
    /// Upper bound for a single delay
    pub max_delay_seconds: u64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
            max_delay_seconds: 60,
        }
    }
}
