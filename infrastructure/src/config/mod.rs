//! Configuration file loading for deep-think
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DEEPTHINK_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./deep-think.toml` or `./.deep-think.toml`
//! 4. Global: `$XDG_CONFIG_HOME/deep-think/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileGeminiConfig, FileOutputConfig, FilePipelineConfig,
    FileRetryConfig, FileSearchConfig,
};
pub use loader::ConfigLoader;
