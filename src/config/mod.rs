//! Configuration for CareMatch
//!
//! Loaded from `~/.carematch/config.json`. Every section is optional; missing
//! fields fall back to the defaults below. A handful of environment variables
//! override file values:
//!
//! | Variable                 | Field                    |
//! |--------------------------|--------------------------|
//! | `CAREMATCH_EXPERTS_URL`  | `providers.experts_url`  |
//! | `CAREMATCH_TRIALS_URL`   | `providers.trials_url`   |
//! | `CAREMATCH_MIN_SCORE`    | `search.min_score`       |
//! | `CAREMATCH_MAX_RESULTS`  | `search.max_results`     |
//!
//! # Example
//!
//! ```json
//! {
//!     "search": { "min_score": 8, "max_results": 10, "failure_policy": "partial" },
//!     "scoring": { "trial": { "remote_bonus": 5 } },
//!     "location": { "city_bonus": 50 },
//!     "providers": { "experts_url": "http://localhost:8080/api/experts" }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{MatchError, Result};
use crate::geo::LocationConfig;
use crate::matching::ScoringConfig;
use crate::search::SearchConfig;

/// Endpoints for the REST candidate providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub experts_url: Option<String>,
    pub trials_url: Option<String>,
    /// Per-provider deadline imposed by the CLI.
    pub timeout_secs: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            experts_url: None,
            trials_url: None,
            timeout_secs: 15,
        }
    }
}

/// Where discussions are stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscussionsConfig {
    /// Custom store path. Defaults to `~/.carematch/discussions.json`.
    pub path: Option<PathBuf>,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub scoring: ScoringConfig,
    pub location: LocationConfig,
    pub providers: ProvidersConfig,
    pub discussions: DiscussionsConfig,
}

impl Config {
    /// The CareMatch home directory (`~/.carematch`).
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".carematch")
    }

    /// Default config file path.
    pub fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load from the default path with environment overrides applied.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// Load from `path`; a missing file yields defaults. Environment
    /// overrides are applied and the result is validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            debug!(path = %path.display(), "Loading configuration");
            serde_json::from_str(&content)?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Config::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CAREMATCH_EXPERTS_URL").filter(|v| !v.trim().is_empty()) {
            self.providers.experts_url = Some(url);
        }
        if let Some(url) = lookup("CAREMATCH_TRIALS_URL").filter(|v| !v.trim().is_empty()) {
            self.providers.trials_url = Some(url);
        }
        if let Some(raw) = lookup("CAREMATCH_MIN_SCORE") {
            match raw.trim().parse::<u8>() {
                Ok(value) => self.search.min_score = value,
                Err(_) => warn!(value = %raw, "Ignoring invalid CAREMATCH_MIN_SCORE"),
            }
        }
        if let Some(raw) = lookup("CAREMATCH_MAX_RESULTS") {
            match raw.trim().parse::<usize>() {
                Ok(value) => self.search.max_results = value,
                Err(_) => warn!(value = %raw, "Ignoring invalid CAREMATCH_MAX_RESULTS"),
            }
        }
    }

    /// Check every section for values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        self.scoring.validate()?;
        self.location.validate()?;
        if self.providers.timeout_secs == 0 {
            return Err(MatchError::Config(
                "providers.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolved discussion store path.
    pub fn discussions_path(&self) -> PathBuf {
        self.discussions
            .path
            .clone()
            .unwrap_or_else(|| Self::dir().join("discussions.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::FailurePolicy;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search.min_score, 8);
        assert_eq!(config.search.max_results, 10);
        assert_eq!(config.search.provider_limit, 40);
        assert_eq!(config.search.failure_policy, FailurePolicy::AllOrNothing);
        assert_eq!(config.location.distance_horizon_km, 200.0);
        assert_eq!(config.providers.timeout_secs, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.search, SearchConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"search": {"failure_policy": "partial"}, "location": {"city_bonus": 55}}"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.search.failure_policy, FailurePolicy::Partial);
        assert_eq!(config.search.max_results, 10);
        assert_eq!(config.location.city_bonus, 55.0);
        assert_eq!(config.location.country_bonus, 20.0);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"search": {"max_results": 0}}"#).unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(MatchError::Config(_))
        ));
    }

    #[test]
    fn test_apply_overrides() {
        let env: HashMap<&str, &str> = [
            ("CAREMATCH_EXPERTS_URL", "http://experts.local/api"),
            ("CAREMATCH_TRIALS_URL", "  "),
            ("CAREMATCH_MIN_SCORE", "12"),
            ("CAREMATCH_MAX_RESULTS", "many"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(
            config.providers.experts_url.as_deref(),
            Some("http://experts.local/api")
        );
        assert!(config.providers.trials_url.is_none());
        assert_eq!(config.search.min_score, 12);
        assert_eq!(config.search.max_results, 10);
    }

    #[test]
    fn test_discussions_path_override() {
        let mut config = Config::default();
        assert!(config.discussions_path().ends_with("discussions.json"));
        config.discussions.path = Some(PathBuf::from("/tmp/forum.json"));
        assert_eq!(config.discussions_path(), PathBuf::from("/tmp/forum.json"));
    }
}
