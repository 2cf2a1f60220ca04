//! Application-level configuration.
//!
//! - [`PipelineParams`]: retry policy, per-call timeout and request defaults

pub mod pipeline_params;

pub use pipeline_params::PipelineParams;
