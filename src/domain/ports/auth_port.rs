//! Authentication port definition.

use async_trait::async_trait;

use crate::domain::entities::{AuthSession, Credentials, PasswordChange, SessionUser, TokenPair};
use crate::domain::errors::ApiError;

/// Port for the `/auth/*` endpoints.
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Exchanges credentials for a user and token pair.
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, ApiError>;

    /// Invalidates the session server-side.
    async fn logout(&self) -> Result<(), ApiError>;

    /// Renews the held token pair from the stored refresh token.
    ///
    /// Overlapping calls, including the client's own 401 handling, share a
    /// single exchange.
    async fn refresh(&self) -> Result<TokenPair, ApiError>;

    /// Returns the user owning the current access token.
    async fn current_user(&self) -> Result<SessionUser, ApiError>;

    /// Changes the signed-in user's password.
    async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError>;
}

#[cfg(test)]
#[allow(missing_docs)]
pub mod mock {
    use super::*;
    use crate::domain::entities::{AuthToken, Role};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Mock authentication port for testing.
    pub struct MockAuthPort {
        should_succeed: Arc<AtomicBool>,
        logout_fails: AtomicBool,
        refresh_fails: AtomicBool,
        logout_calls: AtomicUsize,
        refresh_calls: AtomicUsize,
        user: SessionUser,
    }

    impl MockAuthPort {
        /// Creates new mock.
        pub fn new(should_succeed: bool) -> Self {
            Self {
                should_succeed: Arc::new(AtomicBool::new(should_succeed)),
                logout_fails: AtomicBool::new(false),
                refresh_fails: AtomicBool::new(false),
                logout_calls: AtomicUsize::new(0),
                refresh_calls: AtomicUsize::new(0),
                user: SessionUser::new("1", "admin@example.com", "المدير", Role::Admin),
            }
        }

        pub fn set_should_succeed(&self, value: bool) {
            self.should_succeed.store(value, Ordering::SeqCst);
        }

        pub fn set_logout_fails(&self, value: bool) {
            self.logout_fails.store(value, Ordering::SeqCst);
        }

        pub fn set_refresh_fails(&self, value: bool) {
            self.refresh_fails.store(value, Ordering::SeqCst);
        }

        pub fn logout_calls(&self) -> usize {
            self.logout_calls.load(Ordering::SeqCst)
        }

        pub fn refresh_calls(&self) -> usize {
            self.refresh_calls.load(Ordering::SeqCst)
        }

        pub fn tokens() -> TokenPair {
            TokenPair::new(
                AuthToken::new_unchecked("access-token-1"),
                AuthToken::new_unchecked("refresh-token-1"),
            )
        }
    }

    #[async_trait]
    impl AuthPort for MockAuthPort {
        async fn login(&self, _credentials: &Credentials) -> Result<AuthSession, ApiError> {
            if self.should_succeed.load(Ordering::SeqCst) {
                Ok(AuthSession {
                    user: self.user.clone(),
                    tokens: Self::tokens(),
                })
            } else {
                Err(ApiError::status(401, "بيانات الدخول غير صحيحة"))
            }
        }

        async fn logout(&self) -> Result<(), ApiError> {
            self.logout_calls.fetch_add(1, Ordering::SeqCst);
            if self.logout_fails.load(Ordering::SeqCst) {
                Err(ApiError::network("connection reset"))
            } else {
                Ok(())
            }
        }

        async fn refresh(&self) -> Result<TokenPair, ApiError> {
            let n = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.refresh_fails.load(Ordering::SeqCst) {
                return Err(ApiError::status(401, "refresh token expired"));
            }
            Ok(TokenPair::new(
                AuthToken::new_unchecked(format!("access-token-{}", n + 1)),
                AuthToken::new_unchecked(format!("refresh-token-{}", n + 1)),
            ))
        }

        async fn current_user(&self) -> Result<SessionUser, ApiError> {
            Ok(self.user.clone())
        }

        async fn change_password(&self, _change: &PasswordChange) -> Result<(), ApiError> {
            if self.should_succeed.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(ApiError::status(400, "كلمة المرور الحالية غير صحيحة"))
            }
        }
    }
}
