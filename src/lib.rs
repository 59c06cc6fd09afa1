//! CareMatch - unified candidate matching and ranking engine
//!
//! Ranks domain experts, clinical trials and community discussions against a
//! free-text query enriched with a profile condition, then refines the order
//! by geographic proximity to the profile location.

pub mod candidates;
pub mod config;
pub mod discussions;
pub mod error;
pub mod geo;
pub mod matching;
pub mod providers;
pub mod search;

pub use config::Config;
pub use error::{MatchError, Result};
pub use matching::QueryContext;
pub use search::{SearchEngine, SearchResponse};
