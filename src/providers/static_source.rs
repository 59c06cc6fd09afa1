//! Providers backed by data already on this machine.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{MatchError, Result};

use super::{CandidateProvider, ProviderQuery};

/// Serves a fixed in-memory list, truncated to the requested limit.
///
/// Records are returned unfiltered; relevance is the engine's job.
#[derive(Debug, Clone)]
pub struct StaticProvider<T> {
    name: String,
    records: Vec<T>,
}

impl<T> StaticProvider<T> {
    pub fn new(name: impl Into<String>, records: Vec<T>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl<T> CandidateProvider<T> for StaticProvider<T>
where
    T: Clone + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, query: &ProviderQuery) -> Result<Vec<T>> {
        Ok(self.records.iter().take(query.limit).cloned().collect())
    }
}

/// Reads a JSON array of records from disk on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    name: String,
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<T> CandidateProvider<T> for JsonFileProvider
where
    T: DeserializeOwned + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, query: &ProviderQuery) -> Result<Vec<T>> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Err(MatchError::NotFound(format!(
                "Candidate file not found: {}",
                self.path.display()
            )));
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        let mut records: Vec<T> = serde_json::from_str(&content)?;
        records.truncate(query.limit);

        debug!(
            provider = %self.name,
            path = %self.path.display(),
            count = records.len(),
            "Loaded candidates from file"
        );

        Ok(records)
    }
}
