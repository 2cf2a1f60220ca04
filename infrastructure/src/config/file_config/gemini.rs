//! Gemini provider configuration from TOML (`[gemini]` section)

use super::resolve_api_key;
use serde::{Deserialize, Serialize};

/// Gemini API provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    /// Environment variable name for the API key (default: "GEMINI_API_KEY").
    pub api_key_env: String,
    /// Direct API key. Prefer the environment variable.
    pub api_key: Option<String>,
    /// Model name used for every stage.
    pub model: String,
    /// Base URL for the Generative Language API.
    pub base_url: String,
    /// Hard per-call timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            model: "gemini-2.5-pro".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_seconds: 180,
        }
    }
}

impl FileGeminiConfig {
    /// The configured key, else the value of `api_key_env`
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_api_key(self.api_key.as_deref(), &self.api_key_env)
    }
}
