//! Error types for CareMatch
//!
//! This module defines all error types used by the matching engine.
//! Uses `thiserror` for ergonomic error handling with automatic `Display` and
//! `Error` trait implementations.

use thiserror::Error;

/// Message reported when a query produces no keywords.
pub const EMPTY_QUERY_MESSAGE: &str = "Enter at least one keyword";

/// The primary error type for CareMatch operations.
#[derive(Error, Debug)]
pub enum MatchError {
    /// The merged query tokenized to nothing; no provider was contacted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// One or more candidate providers failed. The message names every failing source.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Configuration-related errors (invalid weights, bad limits, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Resource not found (candidate files, discussion ids, etc.)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl MatchError {
    /// The validation error raised for an empty keyword set.
    pub fn empty_query() -> Self {
        MatchError::Validation(EMPTY_QUERY_MESSAGE.to_string())
    }
}

/// A specialized `Result` type for CareMatch operations.
pub type Result<T> = std::result::Result<T, MatchError>;
