//! Domain layer for deep-think
//!
//! This crate contains the entities, validation rules and pure algorithms of
//! the reasoning pipeline. It performs no I/O and does not log: noteworthy
//! events such as a normalization fallback are reported through return
//! values.
//!
//! # Core Concepts
//!
//! ## Pipeline
//!
//! One query flows through
//! `Plan → [Research] → Think×N → Critique → Refine → Meta-Refine`.
//! Every arrow carries a validated record, never raw model text.
//!
//! ## Normalization
//!
//! Model output is untrusted. [`normalize::normalize`] recovers a JSON
//! object from malformed text or hands back a fallback record, and each
//! entity's `from_json` fills every missing field with a documented default.
//!
//! ## Scoring
//!
//! Candidates are scored on five weighted rubrics and ranked with a stable
//! sort, so identical inputs always give the same ranking.

pub mod config;
pub mod core;
pub mod normalize;
pub mod pipeline;
pub mod prompt;
pub mod reasoning;
pub mod scoring;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{error::DomainError, query::Query};
pub use normalize::{Normalized, Recovery, normalize};
pub use pipeline::{
    request::ThinkRequest,
    result::{DetailedResults, PipelineMetadata, PipelineResult},
    stage::Stage,
};
pub use prompt::PromptTemplate;
pub use reasoning::{
    candidate::Candidate,
    critique::{Critique, Evaluation, RankEntry},
    level::{Confidence, ContributionWeight, Level},
    meta::{DeeperConnection, IntellectualDepth, MetaRefinementResult, PotentialContradiction, SynthesisType},
    plan::{ComplexityLevel, Plan, ReasoningType, ResearchStep, ResearchStepType},
    refinement::{RefinementResult, SourceUsed, TopCandidate, select_top_candidates},
    research::{ResearchFindings, SearchResult, StepFindings},
};
pub use scoring::rubric::{MAX_WEIGHTED_TOTAL, Rubric, RubricScore};
