//! Shared session state mirrored to durable storage.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::entities::{AuthToken, Session, SessionUser, TokenPair};
use crate::domain::errors::StorageError;
use crate::domain::ports::{StorageKey, StoragePort};

/// Owns the session for the lifetime of the application.
///
/// Built once at startup and handed to both the HTTP client and the session
/// store, so the bearer token stamped on requests and the identity shown to
/// the user always come from the same place. Every write goes to durable
/// storage before the in-memory copy changes.
pub struct SessionContext {
    storage: Arc<dyn StoragePort>,
    state: RwLock<Session>,
}

impl SessionContext {
    /// Creates an empty context over the given storage.
    #[must_use]
    pub fn new(storage: Arc<dyn StoragePort>) -> Self {
        Self {
            storage,
            state: RwLock::new(Session::default()),
        }
    }

    /// Underlying durable storage.
    #[must_use]
    pub fn storage(&self) -> Arc<dyn StoragePort> {
        Arc::clone(&self.storage)
    }

    /// Loads the persisted session into memory.
    ///
    /// A `user` entry that no longer parses is dropped rather than failing
    /// startup.
    ///
    /// # Errors
    /// Returns error if storage cannot be read.
    pub async fn restore(&self) -> Result<Session, StorageError> {
        let access_token = self
            .storage
            .get(StorageKey::AccessToken)
            .await?
            .and_then(AuthToken::new);
        let refresh_token = self
            .storage
            .get(StorageKey::RefreshToken)
            .await?
            .and_then(AuthToken::new);
        let user = match self.storage.get(StorageKey::User).await? {
            Some(raw) => match serde_json::from_str::<SessionUser>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable stored user");
                    None
                }
            },
            None => None,
        };

        let session = Session {
            user,
            access_token,
            refresh_token,
        };

        debug!(
            authenticated = session.is_authenticated(),
            has_refresh_token = session.refresh_token.is_some(),
            "Session restored from storage"
        );

        *self.state.write().await = session.clone();
        Ok(session)
    }

    /// Returns a copy of the current session.
    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    /// Token sent as the bearer credential.
    pub async fn access_token(&self) -> Option<AuthToken> {
        self.state.read().await.access_token.clone()
    }

    /// Token exchanged for a new pair.
    pub async fn refresh_token(&self) -> Option<AuthToken> {
        self.state.read().await.refresh_token.clone()
    }

    /// Signed-in user, if any.
    pub async fn user(&self) -> Option<SessionUser> {
        self.state.read().await.user.clone()
    }

    /// Whether an access token is held.
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    /// Stores a freshly authenticated user and token pair.
    ///
    /// # Errors
    /// Returns error if storage rejects a write.
    pub async fn establish(&self, user: SessionUser, tokens: TokenPair) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        self.persist_tokens(&tokens).await?;
        self.persist_user(&user).await?;
        *state = Session::authenticated(user, tokens);
        Ok(())
    }

    /// Replaces both tokens, keeping the user.
    ///
    /// # Errors
    /// Returns error if storage rejects a write.
    pub async fn store_tokens(&self, tokens: &TokenPair) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        self.persist_tokens(tokens).await?;
        state.access_token = Some(tokens.access.clone());
        state.refresh_token = Some(tokens.refresh.clone());
        Ok(())
    }

    /// Replaces the user, keeping the tokens.
    ///
    /// # Errors
    /// Returns error if storage rejects a write.
    pub async fn store_user(&self, user: SessionUser) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        self.persist_user(&user).await?;
        state.user = Some(user);
        Ok(())
    }

    /// Forgets the session in memory and in storage.
    ///
    /// Memory is cleared first and every key removal is attempted even if an
    /// earlier one fails; the first failure is returned.
    ///
    /// # Errors
    /// Returns error if a storage key could not be removed.
    pub async fn clear(&self) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        *state = Session::default();

        let mut first_error = None;
        for key in StorageKey::SESSION {
            if let Err(e) = self.storage.remove(key).await {
                warn!(key = %key, error = %e, "Failed to remove session entry");
                first_error.get_or_insert(e);
            }
        }

        debug!("Session cleared");
        first_error.map_or(Ok(()), Err)
    }

    async fn persist_tokens(&self, tokens: &TokenPair) -> Result<(), StorageError> {
        self.storage
            .set(StorageKey::AccessToken, tokens.access.as_str())
            .await?;
        self.storage
            .set(StorageKey::RefreshToken, tokens.refresh.as_str())
            .await
    }

    async fn persist_user(&self, user: &SessionUser) -> Result<(), StorageError> {
        let raw = serde_json::to_string(user)
            .map_err(|e| StorageError::WriteFailed(format!("failed to encode user: {e}")))?;
        self.storage.set(StorageKey::User, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Role;
    use crate::domain::ports::mocks::MockStorage;

    fn tokens(n: u8) -> TokenPair {
        TokenPair::new(
            AuthToken::new_unchecked(format!("access-{n}")),
            AuthToken::new_unchecked(format!("refresh-{n}")),
        )
    }

    fn user() -> SessionUser {
        SessionUser::new("1", "admin@example.com", "Admin", Role::Admin)
    }

    #[tokio::test]
    async fn test_establish_writes_all_keys() {
        let storage = Arc::new(MockStorage::new());
        let context = SessionContext::new(storage.clone());

        context.establish(user(), tokens(1)).await.unwrap();

        let stored = storage.snapshot().await;
        assert_eq!(stored.get(&StorageKey::AccessToken).unwrap(), "access-1");
        assert_eq!(stored.get(&StorageKey::RefreshToken).unwrap(), "refresh-1");
        assert!(stored.get(&StorageKey::User).unwrap().contains("admin@example.com"));
        assert!(context.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_restore_reads_persisted_session() {
        let storage = Arc::new(MockStorage::new());
        SessionContext::new(storage.clone())
            .establish(user(), tokens(3))
            .await
            .unwrap();

        let context = SessionContext::new(storage);
        let session = context.restore().await.unwrap();

        assert!(session.is_authenticated());
        assert_eq!(context.access_token().await.unwrap().as_str(), "access-3");
    }

    #[tokio::test]
    async fn test_restore_drops_corrupt_user() {
        let storage = Arc::new(MockStorage::new());
        storage.set(StorageKey::User, "{not json").await.unwrap();
        storage.set(StorageKey::AccessToken, "a").await.unwrap();

        let context = SessionContext::new(storage);
        let session = context.restore().await.unwrap();

        assert!(session.user.is_none());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_clear_removes_session_keys_only() {
        let storage = Arc::new(MockStorage::new());
        storage.set(StorageKey::ErrorLogs, "[]").await.unwrap();
        let context = SessionContext::new(storage.clone());
        context.establish(user(), tokens(1)).await.unwrap();

        context.clear().await.unwrap();

        let stored = storage.snapshot().await;
        for key in StorageKey::SESSION {
            assert!(!stored.contains_key(&key));
        }
        assert!(stored.contains_key(&StorageKey::ErrorLogs));
        assert!(context.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_untouched() {
        let storage = Arc::new(MockStorage::new());
        let context = SessionContext::new(storage.clone());
        storage.set_fail_writes(true);

        assert!(context.establish(user(), tokens(1)).await.is_err());
        assert!(!context.is_authenticated().await);
    }
}
