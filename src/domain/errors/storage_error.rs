//! Durable storage error types.

use thiserror::Error;

/// Durable storage error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum StorageError {
    #[error("failed to access storage: {0}")]
    AccessFailed(String),

    #[error("failed to read entry: {0}")]
    ReadFailed(String),

    #[error("failed to write entry: {0}")]
    WriteFailed(String),

    #[error("failed to delete entry: {0}")]
    DeletionFailed(String),

    #[error("storage backend not available: {0}")]
    NotAvailable(String),
}
