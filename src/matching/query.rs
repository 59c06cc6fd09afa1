//! Query context and profile-aware query expansion.

use serde::{Deserialize, Serialize};

use crate::candidates::GeoPoint;
use crate::error::{MatchError, Result};

use super::tokenize::tokenize;

/// Inputs for one search call: the typed query plus profile defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryContext {
    /// User-typed query.
    pub raw_query: String,
    /// Profile condition, merged into the query when missing.
    pub condition: Option<String>,
    /// Profile location, e.g. `"Boston, USA"`.
    pub location: Option<String>,
    /// Profile coordinates, when known.
    pub coordinates: Option<GeoPoint>,
}

impl QueryContext {
    pub fn new(raw_query: impl Into<String>) -> Self {
        Self {
            raw_query: raw_query.into(),
            ..Default::default()
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_coordinates(mut self, point: GeoPoint) -> Self {
        self.coordinates = Some(point);
        self
    }

    /// Trimmed condition, `None` when absent or blank.
    pub fn condition(&self) -> Option<&str> {
        non_blank(self.condition.as_deref())
    }

    /// Trimmed location, `None` when absent or blank.
    pub fn location(&self) -> Option<&str> {
        non_blank(self.location.as_deref())
    }

    /// The raw query with the profile condition merged in.
    pub fn merged_query(&self) -> String {
        merge_query(&self.raw_query, self.condition().unwrap_or(""))
    }

    /// Keywords for this search.
    ///
    /// Fails with a validation error when the merged query has no tokens.
    pub fn keywords(&self) -> Result<Vec<String>> {
        let keywords = tokenize(&self.merged_query());
        if keywords.is_empty() {
            return Err(MatchError::empty_query());
        }
        Ok(keywords)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Append `condition` to `raw_query` unless the query already mentions it.
///
/// The containment check is case-insensitive; the result is trimmed.
pub fn merge_query(raw_query: &str, condition: &str) -> String {
    let query = raw_query.trim();
    let condition = condition.trim();

    if condition.is_empty() {
        return query.to_string();
    }
    if query.is_empty() {
        return condition.to_string();
    }
    if query.to_lowercase().contains(&condition.to_lowercase()) {
        return query.to_string();
    }

    format!("{} {}", query, condition)
}
