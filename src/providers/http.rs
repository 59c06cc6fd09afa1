//! REST candidate provider.
//!
//! Issues `GET {base_url}?search=..&condition=..&location=..&limit=..` and
//! expects a JSON array of records in the response body.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{MatchError, Result};

use super::{CandidateProvider, ProviderQuery};

/// Fetches candidate records from an HTTP endpoint.
pub struct HttpProvider<T> {
    name: String,
    base_url: String,
    client: reqwest::Client,
    _record: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for HttpProvider<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl<T> HttpProvider<T> {
    /// Create a provider for `base_url` using a default client.
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Self::with_client(name, base_url, reqwest::Client::new())
    }

    /// Create a provider that shares an existing client.
    pub fn with_client(
        name: impl Into<String>,
        base_url: impl Into<String>,
        client: reqwest::Client,
    ) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(MatchError::Config("provider URL cannot be empty".to_string()));
        }
        Ok(Self {
            name: name.into(),
            base_url,
            client,
            _record: PhantomData,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build (without sending) the request for `query`.
    pub fn build_request(&self, query: &ProviderQuery) -> Result<reqwest::Request> {
        let request = self
            .client
            .get(&self.base_url)
            .query(&query.params())
            .header(reqwest::header::ACCEPT, "application/json")
            .build()?;
        Ok(request)
    }
}

#[async_trait]
impl<T> CandidateProvider<T> for HttpProvider<T>
where
    T: DeserializeOwned + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, query: &ProviderQuery) -> Result<Vec<T>> {
        let request = self.build_request(query)?;
        debug!(provider = %self.name, url = %request.url(), "Fetching candidates");

        let response = self.client.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            warn!(provider = %self.name, status = %status, "Candidate provider returned error status");
            return Err(MatchError::Provider(format!(
                "{} returned HTTP {}",
                self.name, status
            )));
        }

        let mut records: Vec<T> = response.json().await?;
        records.truncate(query.limit);
        Ok(records)
    }
}
