//! Keyring-based session storage.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::errors::StorageError;
use crate::domain::ports::{StorageKey, StoragePort};

const KEYRING_SERVICE: &str = "portfolio-admin";

/// System keyring storage adapter, one keyring entry per key.
pub struct KeyringStorage {
    service: String,
}

impl KeyringStorage {
    /// Creates new storage with the default service name.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
        }
    }

    /// Creates storage with a custom service name.
    #[must_use]
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: StorageKey) -> Result<Entry, StorageError> {
        Entry::new(&self.service, key.as_str())
            .map_err(|e| StorageError::AccessFailed(format!("failed to access keyring: {e}")))
    }
}

impl Default for KeyringStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoragePort for KeyringStorage {
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        debug!(service = %self.service, key = %key, "Reading keyring entry");

        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read keyring entry");
                Err(StorageError::ReadFailed(e.to_string()))
            }
        }
    }

    async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        debug!(service = %self.service, key = %key, "Writing keyring entry");

        self.entry(key)?.set_password(value).map_err(|e| {
            warn!(key = %key, error = %e, "Failed to write keyring entry");
            StorageError::WriteFailed(e.to_string())
        })
    }

    async fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to delete keyring entry");
                Err(StorageError::DeletionFailed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires system keyring"]
    async fn test_store_and_retrieve_value() {
        let storage = KeyringStorage::with_service("portfolio-admin-test");

        storage.set(StorageKey::AccessToken, "abc.def.ghi").await.unwrap();
        assert_eq!(
            storage.get(StorageKey::AccessToken).await.unwrap().as_deref(),
            Some("abc.def.ghi")
        );

        storage.remove(StorageKey::AccessToken).await.unwrap();
        assert!(storage.get(StorageKey::AccessToken).await.unwrap().is_none());
    }
}
