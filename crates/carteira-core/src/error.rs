//! Error types for the carteira-core library.
//!
//! Extraction itself never fails: problems found while reading a document are
//! reported as [`ExtractionIssue`](crate::models::document::ExtractionIssue)
//! values inside the result. The errors below cover the ambient surface
//! (configuration and file handling).

use thiserror::Error;

/// Main error type for the carteira library.
#[derive(Error, Debug)]
pub enum CarteiraError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the carteira library.
pub type Result<T> = std::result::Result<T, CarteiraError>;
