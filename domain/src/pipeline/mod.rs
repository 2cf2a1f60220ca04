//! Pipeline-level types: request validation, stages and the final result.

pub mod request;
pub mod result;
pub mod stage;
