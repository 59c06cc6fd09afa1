//! Deadline wrapper for candidate providers.
//!
//! The engine itself never times out a provider; callers that want a bound
//! wrap their providers in [`TimeoutProvider`] before handing them over.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::error::{MatchError, Result};

use super::{CandidateProvider, ProviderQuery};

/// Fails a fetch that does not complete within `timeout`.
pub struct TimeoutProvider<T: Send> {
    inner: Box<dyn CandidateProvider<T>>,
    timeout: Duration,
}

impl<T: Send> std::fmt::Debug for TimeoutProvider<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeoutProvider")
            .field("inner", &self.inner.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl<T: Send> TimeoutProvider<T> {
    pub fn new(inner: Box<dyn CandidateProvider<T>>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<T: Send> CandidateProvider<T> for TimeoutProvider<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch(&self, query: &ProviderQuery) -> Result<Vec<T>> {
        match tokio::time::timeout(self.timeout, self.inner.fetch(query)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    provider = self.inner.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Candidate provider timed out"
                );
                Err(MatchError::Provider(format!(
                    "{} timed out after {}ms",
                    self.inner.name(),
                    self.timeout.as_millis()
                )))
            }
        }
    }
}
