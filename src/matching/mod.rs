//! Text relevance: tokenization, query expansion and entity scoring.
//!
//! # Architecture
//!
//! - **tokenize**: keyword extraction and the per-field recall metric
//! - **query**: `QueryContext` and merging the profile condition into the query
//! - **scorer**: weight tables and the per-entity scorers built from them

pub mod query;
pub mod scorer;
pub mod tokenize;

pub use query::{merge_query, QueryContext};
pub use scorer::{
    clamp_score, DiscussionWeights, EntityScorer, ExpertWeights, FieldWeight, ScoringConfig,
    TrialWeights, MAX_SCORE,
};
pub use tokenize::{field_score, tokenize};
