//! Errors raised by snapshot derivation.
//!
//! All of these are permanent: they are a deterministic function of the
//! request and the dataset schema, so re-running the same derivation fails
//! the same way.

use crate::query::QueryError;

/// Result type for snapshot derivation.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnapshotError {
    /// The named asset is not defined on the resolved dataset.
    #[error("Asset specification not found: '{asset}' on dataset '{dataset}'")]
    AssetNotFound { dataset: String, asset: String },

    /// The request's mode tag is missing, unrecognized, or lacks its payload.
    #[error("Snapshot does not have required mode information: {0}")]
    InvalidSnapshot(String),

    /// The request violates a structural constraint of the engine.
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<String>,
    },

    /// No dataset with the given name is known.
    #[error("Dataset not found: '{0}'")]
    DatasetNotFound(String),

    /// The snapshot query could not be parsed.
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),

    /// The dataset schema refers to a table or column it does not contain.
    #[error("Corrupt dataset metadata: {0}")]
    CorruptMetadata(String),
}

impl SnapshotError {
    pub fn validation(message: impl Into<String>) -> Self {
        SnapshotError::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Detail lines reported alongside the message when a job fails.
    pub fn details(&self) -> &[String] {
        match self {
            SnapshotError::Validation { details, .. } => details,
            _ => &[],
        }
    }

    /// Derivation errors never go away on retry with the same input.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
