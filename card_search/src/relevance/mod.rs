//! Relevance gate and scoring for search candidates

mod filter;
mod scoring;

pub use filter::{filter_candidates, passes_filter};
pub use scoring::{rank, rank_candidates, score, ScoredCandidate};
