//! Core domain concepts shared across all subdomains.
//!
//! - [`query::Query`] - a validated query to run through the pipeline
//! - [`error::DomainError`] - input validation errors
//! - [`string`] - UTF-8 safe previews for log fields and prompts

pub mod error;
pub mod query;
pub mod string;
