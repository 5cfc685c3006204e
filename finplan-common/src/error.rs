//! Common error types for FinPlan

use thiserror::Error;

/// Common result type for FinPlan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across FinPlan crates
///
/// The classifier and normalizer never produce these; they are total.
/// Errors only arise at the persistence and configuration boundaries.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored JSON document could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
