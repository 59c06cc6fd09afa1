//! Unified search over experts, trials and discussions.
//!
//! [`SearchEngine`] merges the query with the profile condition, fans out to
//! the expert and trial providers concurrently, scores every candidate,
//! drops noise below `min_score`, ranks each list by relevance and proximity
//! and truncates it to `max_results`.
//!
//! # Failure policy
//!
//! - `all_or_nothing` (default): any provider failure fails the whole search
//!   with a single [`MatchError::Provider`](crate::error::MatchError::Provider).
//! - `partial`: a failing section comes back empty and its error is reported
//!   in [`SearchResponse::errors`].
//!
//! # Stale responses
//!
//! Every successful search carries a monotonically increasing `sequence`.
//! Callers that may have several searches in flight can use [`SequenceGate`]
//! to drop responses older than the last one they applied.

mod engine;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::candidates::{Discussion, Expert, Scored, Trial};
use crate::error::{MatchError, Result};
use crate::providers::DEFAULT_PROVIDER_LIMIT;

pub use engine::SearchEngine;

/// What to do when one provider fails and the other succeeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Fail the whole search with one aggregate error.
    #[default]
    AllOrNothing,
    /// Return what succeeded and report per-section errors.
    Partial,
}

/// Limits and thresholds for a search (the `search` config section).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Candidates scoring below this are dropped as noise.
    pub min_score: u8,
    /// Maximum entries per result list.
    pub max_results: usize,
    /// Number of records requested from each provider.
    pub provider_limit: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_score: 8,
            max_results: 10,
            provider_limit: DEFAULT_PROVIDER_LIMIT,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_results == 0 {
            return Err(MatchError::Config(
                "search.max_results must be positive".to_string(),
            ));
        }
        if self.provider_limit == 0 {
            return Err(MatchError::Config(
                "search.provider_limit must be positive".to_string(),
            ));
        }
        if self.min_score > 100 {
            return Err(MatchError::Config(format!(
                "search.min_score must be at most 100, got {}",
                self.min_score
            )));
        }
        Ok(())
    }
}

/// Per-section provider errors, only populated under [`FailurePolicy::Partial`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trials: Option<String>,
}

impl SectionErrors {
    pub fn is_empty(&self) -> bool {
        self.experts.is_none() && self.trials.is_none()
    }
}

/// Ranked results of one search call.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    /// Position of this call among all calls on the same engine.
    pub sequence: u64,
    /// The query after merging in the profile condition.
    pub query: String,
    pub keywords: Vec<String>,
    pub experts: Vec<Scored<Expert>>,
    pub trials: Vec<Scored<Trial>>,
    pub discussions: Vec<Scored<Discussion>>,
    #[serde(skip_serializing_if = "SectionErrors::is_empty")]
    pub errors: SectionErrors,
}

impl SearchResponse {
    /// Total number of results across all sections.
    pub fn total(&self) -> usize {
        self.experts.len() + self.trials.len() + self.discussions.len()
    }
}

/// Caller-side guard against out-of-order responses.
///
/// `accept` returns `true` only for a sequence newer than every sequence
/// accepted so far.
#[derive(Debug, Default)]
pub struct SequenceGate {
    last_applied: AtomicU64,
}

impl SequenceGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&self, sequence: u64) -> bool {
        let previous = self.last_applied.fetch_max(sequence, Ordering::AcqRel);
        sequence > previous
    }

    pub fn last_applied(&self) -> u64 {
        self.last_applied.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_config_validate() {
        assert!(SearchConfig::default().validate().is_ok());

        let zero = SearchConfig {
            max_results: 0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(MatchError::Config(_))));

        let too_strict = SearchConfig {
            min_score: 101,
            ..Default::default()
        };
        assert!(too_strict.validate().is_err());
    }

    #[test]
    fn test_failure_policy_serde() {
        let policy: FailurePolicy = serde_json::from_str("\"partial\"").unwrap();
        assert_eq!(policy, FailurePolicy::Partial);
        assert_eq!(
            serde_json::to_string(&FailurePolicy::AllOrNothing).unwrap(),
            "\"all_or_nothing\""
        );
    }

    #[test]
    fn test_sequence_gate_drops_stale() {
        let gate = SequenceGate::new();
        assert!(gate.accept(1));
        assert!(gate.accept(3));
        assert!(!gate.accept(2));
        assert!(!gate.accept(3));
        assert!(gate.accept(4));
        assert_eq!(gate.last_applied(), 4);
    }

    #[test]
    fn test_response_hides_empty_errors() {
        let response = SearchResponse {
            sequence: 1,
            query: "lung".into(),
            keywords: vec!["lung".into()],
            experts: vec![],
            trials: vec![],
            discussions: vec![],
            errors: SectionErrors::default(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("errors").is_none());
        assert_eq!(response.total(), 0);
    }
}
