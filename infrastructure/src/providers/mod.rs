//! LLM provider adapters
//!
//! Each adapter implements [`LlmGateway`](deepthink_application::LlmGateway)
//! for one vendor API.

pub mod gemini;

pub use gemini::{GeminiConfig, GeminiGateway};
