//! Store error types.

use thiserror::Error;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// An update cycle is already in flight.
    #[error("Update cycle already in progress")]
    CycleInProgress,

    /// A settings value failed validation.
    #[error("Invalid setting: {0}")]
    InvalidValue(String),

    /// Settings file watcher failed.
    #[error("Watcher error: {0}")]
    Watch(String),
}
