//! Stub keyring storage for builds without keyring support.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::errors::StorageError;
use crate::domain::ports::{StorageKey, StoragePort};

/// Stub storage that holds nothing.
/// Used when keyring feature is disabled.
pub struct KeyringStorage;

impl KeyringStorage {
    /// Creates new stub storage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Creates storage with a custom service name (no-op in stub).
    #[must_use]
    pub fn with_service(_service: impl Into<String>) -> Self {
        Self
    }
}

impl Default for KeyringStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoragePort for KeyringStorage {
    async fn get(&self, _key: StorageKey) -> Result<Option<String>, StorageError> {
        debug!("Keyring feature disabled - nothing stored");
        Ok(None)
    }

    async fn set(&self, _key: StorageKey, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::NotAvailable(
            "keyring feature disabled at build time".into(),
        ))
    }

    async fn remove(&self, _key: StorageKey) -> Result<(), StorageError> {
        Ok(())
    }
}
