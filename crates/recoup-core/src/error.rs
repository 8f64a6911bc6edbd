//! Error types for the recoup-core library.

use thiserror::Error;

/// Main error type for the recoup library.
///
/// Extraction and validation never fail; they degrade to null fields and
/// accumulated error strings instead. This type covers the edges that can
/// genuinely go wrong: configuration files, JSON boundaries, and the
/// document classifier behind the routing seam.
#[derive(Error, Debug)]
pub enum RecoupError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Document classification failed.
    #[error("classification error: {0}")]
    Classification(String),
}

/// Result type for the recoup library.
pub type Result<T> = std::result::Result<T, RecoupError>;
