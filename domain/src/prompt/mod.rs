//! Prompt domain
//!
//! Prompt builders and response schemas for each stage of the pipeline.

pub mod schema;
mod template;

pub use template::PromptTemplate;
