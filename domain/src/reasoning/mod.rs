//! Reasoning entities produced by each pipeline stage.
//!
//! Every entity is built once from a normalized model response through its
//! `from_json` validate-and-enhance constructor, or through `fallback` when
//! the response couldn't be recovered. Nothing here is mutated afterwards.
//!
//! | Stage | Entity |
//! |-------|--------|
//! | Planning | [`plan::Plan`] |
//! | Research | [`research::ResearchFindings`] |
//! | Thinking | [`candidate::Candidate`] |
//! | Critique | [`critique::Critique`] |
//! | Refinement | [`refinement::RefinementResult`] |
//! | Meta-refinement | [`meta::MetaRefinementResult`] |

pub mod candidate;
pub mod critique;
pub mod level;
pub mod meta;
pub mod plan;
pub mod refinement;
pub mod research;
