//! Error types for Rollcall
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Rollcall
#[derive(Debug, Error)]
pub enum RollcallError {
    /// A student with this ID is already in the store
    #[error("Student ID already exists: {0}")]
    DuplicateId(String),

    /// No student with this ID is in the store
    #[error("Student ID not found: {0}")]
    NotFound(String),

    /// A stored entry is missing required fields or has the wrong shape
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// The persisted file could not be parsed as a whole
    #[error("Corrupt store: {0}")]
    CorruptStore(String),

    /// Attendance status outside present/absent
    #[error("Invalid attendance status: {0}")]
    InvalidStatus(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Rollcall operations
pub type Result<T> = std::result::Result<T, RollcallError>;
