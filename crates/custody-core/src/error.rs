//! Error types shared across the custody workspace

use crate::types::DocumentId;
use thiserror::Error;

/// Custody error types
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced document does not exist. Non-retryable: the branch
    /// of the ancestor graph is abandoned and logged.
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    /// Ledger or document storage failed. Retryable via job redelivery.
    #[error("Storage failed: {0}")]
    Storage(String),

    /// Job submission or delivery failed. Retryable.
    #[error("Queue failed: {0}")]
    Queue(String),

    /// The data violates an invariant the engine relies on, e.g. a
    /// terminal operation on a document that never recorded a received
    /// quantity. Surfaced as a defect, never silently defaulted.
    #[error("Data inconsistency: {0}")]
    DataInconsistency(String),
}

/// Result type for custody operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a storage error
    pub fn storage_failed(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a queue error
    pub fn queue_failed(msg: impl Into<String>) -> Self {
        Self::Queue(msg.into())
    }

    /// Create a data inconsistency error
    pub fn inconsistency(msg: impl Into<String>) -> Self {
        Self::DataInconsistency(msg.into())
    }

    /// Whether redelivering the failed job can succeed.
    ///
    /// `NotFound` and `DataInconsistency` describe the state of the
    /// data, not a transient fault, so retrying would only repeat the
    /// failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Queue(_))
    }
}
