//! Durable key/value storage port definition.

use async_trait::async_trait;

use crate::domain::errors::StorageError;

/// Keys the client persists between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    /// Bearer token.
    AccessToken,
    /// Token used to renew the pair.
    RefreshToken,
    /// Signed-in user as JSON.
    User,
    /// Retained error reports as JSON.
    ErrorLogs,
}

impl StorageKey {
    /// Keys that make up the session.
    pub const SESSION: [Self; 3] = [Self::AccessToken, Self::RefreshToken, Self::User];

    /// Stored key name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "accessToken",
            Self::RefreshToken => "refreshToken",
            Self::User => "user",
            Self::ErrorLogs => "errorLogs",
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Port for durable client-side storage.
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Reads a value.
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    /// Writes a value, replacing any previous one.
    async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;

    /// Removes a value; missing keys are not an error.
    async fn remove(&self, key: StorageKey) -> Result<(), StorageError>;

    /// Checks if a value exists.
    async fn contains(&self, key: StorageKey) -> Result<bool, StorageError> {
        Ok(self.get(key).await?.is_some())
    }

    /// Persists buffered writes.
    async fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(missing_docs)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::RwLock;

    /// Storage mock that can be switched into a failing state.
    pub struct MockStorage {
        values: Arc<RwLock<HashMap<StorageKey, String>>>,
        fail_writes: AtomicBool,
    }

    impl MockStorage {
        pub fn new() -> Self {
            Self {
                values: Arc::new(RwLock::new(HashMap::new())),
                fail_writes: AtomicBool::new(false),
            }
        }

        pub fn set_fail_writes(&self, value: bool) {
            self.fail_writes.store(value, Ordering::SeqCst);
        }

        pub async fn snapshot(&self) -> HashMap<StorageKey, String> {
            self.values.read().await.clone()
        }
    }

    impl Default for MockStorage {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl StoragePort for MockStorage {
        async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
            Ok(self.values.read().await.get(&key).cloned())
        }

        async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageError::WriteFailed("mock failure".into()));
            }
            self.values.write().await.insert(key, value.to_string());
            Ok(())
        }

        async fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
            self.values.write().await.remove(&key);
            Ok(())
        }
    }
}
