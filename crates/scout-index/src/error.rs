//! Error types for the scout-index crate.

use std::io;

use thiserror::Error;

/// Errors that can occur when working with the search engine.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The query text is shorter than the configured minimum.
    #[error("query too short: need at least {min} characters, got {len}")]
    QueryTooShort {
        /// Configured minimum length.
        min: usize,
        /// Length of the trimmed query text.
        len: usize,
    },

    /// Pagination parameters are out of range.
    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    /// I/O error while reading or writing snapshots.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Index state could not be encoded for persistence.
    #[error("failed to encode snapshot: {0}")]
    SnapshotEncode(String),

    /// Configuration error surfaced while opening the engine.
    #[error(transparent)]
    Config(#[from] scout_config::ConfigError),

    /// An index lock was poisoned by a panicking writer.
    #[error("index lock poisoned")]
    LockPoisoned,
}
