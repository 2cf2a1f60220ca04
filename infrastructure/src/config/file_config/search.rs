//! Search provider configuration from TOML (`[search]` section)

use super::resolve_api_key;
use serde::{Deserialize, Serialize};

/// Tavily search configuration. Without a key the simulated provider is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSearchConfig {
    /// Environment variable name for the API key (default: "TAVILY_API_KEY").
    pub api_key_env: String,
    /// Direct API key. Prefer the environment variable.
    pub api_key: Option<String>,
    /// Base URL for the Tavily API.
    pub base_url: String,
    /// Results kept per research step.
    pub max_results: usize,
    /// HTTP timeout per search in seconds.
    pub timeout_seconds: u64,
}

impl Default for FileSearchConfig {
    fn default() -> Self {
        Self {
            api_key_env: "TAVILY_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.tavily.com".to_string(),
            max_results: 3,
            timeout_seconds: 30,
        }
    }
}

impl FileSearchConfig {
    /// The configured key, else the value of `api_key_env`
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_api_key(self.api_key.as_deref(), &self.api_key_env)
    }
}
