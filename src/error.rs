//! Custom error types for snapkeep
//!
//! This module defines the error hierarchy for the tool using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for snapkeep operations
#[derive(Error, Debug)]
pub enum SnapkeepError {
    /// Configuration-related errors (bad settings file, malformed pattern)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Precondition failures (project marker file missing)
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// A file or directory could not be copied into the snapshot
    #[error("Copy error: {0}")]
    Copy(String),

    /// A stale snapshot could not be deleted during retention cleanup
    #[error("Retention error: {0}")]
    Retention(String),
}

impl SnapkeepError {
    /// Create a precondition error for a missing marker file
    pub fn marker_missing(marker: impl Into<String>) -> Self {
        Self::Precondition(format!(
            "must be run from project root ({} not found)",
            marker.into()
        ))
    }

    /// Check if this is a precondition error
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for SnapkeepError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SnapkeepError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for snapkeep operations
pub type SnapkeepResult<T> = Result<T, SnapkeepError>;
