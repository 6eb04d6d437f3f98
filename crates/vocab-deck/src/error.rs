//! Error types for vocab-deck.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for vocab-deck operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a deck.
#[derive(Debug, Error)]
pub enum Error {
    /// An input CSV file does not exist.
    #[error("{} not found", .0.display())]
    MissingInput(PathBuf),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error while building collection metadata.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SQLite error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// ZIP error.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
