//! CLI command handlers.

pub(crate) mod discussions;
pub(crate) mod search;

use std::path::Path;

use anyhow::{Context, Result};

use carematch::config::Config;

/// Load configuration from an explicit path or the default location.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Config::load().with_context(|| "Failed to load configuration"),
    }
}
