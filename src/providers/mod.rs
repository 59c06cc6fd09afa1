//! Candidate providers for CareMatch
//!
//! Experts and trials come from external sources that are treated as black
//! boxes: they receive a [`ProviderQuery`] and return a list of records or an
//! error. The engine fetches both populations concurrently on every search.
//!
//! # Implementations
//!
//! - **static_source**: in-memory lists and JSON array files
//! - **http**: a REST backend queried with `search`/`condition`/`location`/`limit`
//! - **timeout**: wraps any provider with a caller-imposed deadline
//!
//! # Example
//!
//! ```rust
//! use carematch::candidates::Trial;
//! use carematch::providers::{CandidateProvider, ProviderQuery, StaticProvider};
//!
//! # tokio_test_block(async {
//! let provider = StaticProvider::new("trials", vec![Trial::default(); 3]);
//! let query = ProviderQuery::new("asthma", 2);
//! let trials = provider.fetch(&query).await.unwrap();
//! assert_eq!(trials.len(), 2);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

pub mod http;
pub mod static_source;
pub mod timeout;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::matching::QueryContext;

pub use http::HttpProvider;
pub use static_source::{JsonFileProvider, StaticProvider};
pub use timeout::TimeoutProvider;

/// Default number of records requested from each provider.
pub const DEFAULT_PROVIDER_LIMIT: usize = 40;

/// Request sent to a candidate provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderQuery {
    /// Merged search text.
    pub search: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Maximum number of records to return.
    pub limit: usize,
}

impl ProviderQuery {
    pub fn new(search: impl Into<String>, limit: usize) -> Self {
        Self {
            search: search.into(),
            condition: None,
            location: None,
            limit,
        }
    }

    /// Build the provider request for a search context.
    pub fn from_context(ctx: &QueryContext, limit: usize) -> Self {
        Self {
            search: ctx.merged_query(),
            condition: ctx.condition().map(str::to_string),
            location: ctx.location().map(str::to_string),
            limit,
        }
    }

    /// Query-string pairs in a stable order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("search", self.search.clone())];
        if let Some(ref condition) = self.condition {
            params.push(("condition", condition.clone()));
        }
        if let Some(ref location) = self.location {
            params.push(("location", location.clone()));
        }
        params.push(("limit", self.limit.to_string()));
        params
    }
}

/// A source of candidate records of type `T`.
#[async_trait]
pub trait CandidateProvider<T: Send>: Send + Sync {
    /// Short name used in logs and aggregate errors.
    fn name(&self) -> &str;

    /// Fetch up to `query.limit` records. An empty list is a valid answer.
    async fn fetch(&self, query: &ProviderQuery) -> Result<Vec<T>>;
}
