//! Error types for fetch and cache operations.
//!
//! This module defines [`DataError`], the closed taxonomy of failures that
//! can occur while fetching, normalizing, or caching series data.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during series acquisition and caching.
#[derive(Error, Debug)]
pub enum DataError {
    /// Terminal HTTP failure: a non-retryable status, or the last error
    /// response after the retry budget was exhausted.
    #[error("HTTP {status} fetching {series}")]
    Http {
        /// Series the request was issued for.
        series: String,
        /// Final HTTP status code.
        status: u16,
        /// Response body, when one was readable.
        body: String,
    },

    /// Connection-level failure (DNS, connect, timeout) that survived the
    /// retry budget.
    #[error("Network error: {0}")]
    Network(String),

    /// Success status whose payload does not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Sidecar metadata file exists but is not valid JSON. Metadata is
    /// advisory; callers treat this the same as an absent sidecar.
    #[error("Corrupt cache metadata at {}", path.display())]
    CorruptMetadata {
        /// Path of the unreadable sidecar file.
        path: PathBuf,
    },

    /// Filesystem read/write/rename failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// DataFrame encode/decode failure.
    #[error("Format error: {0}")]
    Format(String),

    /// Invalid configuration or catalog.
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;
