//! Infrastructure layer for deep-think
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod providers;
pub mod search;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileGeminiConfig, FileOutputConfig,
    FilePipelineConfig, FileRetryConfig, FileSearchConfig,
};
pub use providers::{GeminiConfig, GeminiGateway};
pub use search::{SimulatedSearch, TavilySearch, search_provider_from_config};
