//! Rubric scoring and ranking of evaluated candidates.

pub mod ranking;
pub mod rubric;
