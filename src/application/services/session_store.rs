//! Login, logout and token refresh workflow.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use super::error_messages::user_message;
use crate::domain::entities::{Credentials, PasswordChange, Session, SessionUser};
use crate::domain::errors::{ApiError, StorageError};
use crate::domain::ports::AuthPort;
use crate::domain::services::SessionContext;

#[derive(Debug, Default)]
struct StoreState {
    error: Option<String>,
    loading: bool,
}

/// Session operations exposed to the back-office.
///
/// Identity and tokens live in the shared [`SessionContext`]; this store adds
/// the last user-facing error and an in-progress flag on top of it.
pub struct SessionStore {
    auth: Arc<dyn AuthPort>,
    context: Arc<SessionContext>,
    state: Mutex<StoreState>,
}

impl SessionStore {
    /// Store over `auth`, sharing `context` with the API client.
    #[must_use]
    pub fn new(auth: Arc<dyn AuthPort>, context: Arc<SessionContext>) -> Self {
        Self {
            auth,
            context,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Restores the persisted session.
    ///
    /// # Errors
    /// Returns error if storage cannot be read.
    pub async fn init(&self) -> Result<Session, StorageError> {
        let session = self.context.restore().await?;
        if session.is_authenticated() {
            debug!(
                user = session.user.as_ref().map(SessionUser::email),
                "Resuming stored session"
            );
        }
        Ok(session)
    }

    /// Flushes storage before shutdown.
    ///
    /// # Errors
    /// Returns error if buffered writes cannot be persisted.
    pub async fn teardown(&self) -> Result<(), StorageError> {
        self.context.storage().flush().await
    }

    /// Signs in and stores the returned user and tokens.
    ///
    /// # Errors
    /// Returns validation error for empty fields, or the API error; either way
    /// the message is kept in [`Self::error`].
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionUser, ApiError> {
        let missing = credentials.missing_fields();
        if !missing.is_empty() {
            let error = ApiError::validation(format!("{} مطلوب", missing.join("، ")));
            self.fail(&error);
            return Err(error);
        }

        self.begin();
        let result = self.authenticate(credentials).await;
        self.finish(result.as_ref().err());
        result
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<SessionUser, ApiError> {
        let session = self.auth.login(credentials).await.map_err(|e| {
            warn!(email = credentials.email(), error = %e, "Login rejected");
            e
        })?;

        let user = session.user.clone();
        self.context.establish(session.user, session.tokens).await?;

        info!(user_id = user.id(), email = user.email(), "Signed in");
        Ok(user)
    }

    /// Signs out.
    ///
    /// The server is told best-effort; local state is cleared regardless.
    ///
    /// # Errors
    /// Returns error only if stored session entries could not be removed.
    pub async fn logout(&self) -> Result<(), StorageError> {
        if self.context.access_token().await.is_some() {
            if let Err(e) = self.auth.logout().await {
                warn!(error = %e, "Server logout failed, clearing local session anyway");
            }
        }

        self.state.lock().error = None;
        let result = self.context.clear().await;
        if let Err(e) = &result {
            error!(error = %e, "Failed to clear stored session");
        }
        info!("Signed out");
        result
    }

    /// Renews the token pair, joining any refresh already in flight.
    ///
    /// # Errors
    /// Returns [`ApiError::NoRefreshToken`] when none is held. A rejected
    /// refresh signs the user out and returns the rejection.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        if self.context.refresh_token().await.is_none() {
            return Err(ApiError::NoRefreshToken);
        }

        match self.auth.refresh().await {
            Ok(tokens) => {
                self.context.store_tokens(&tokens).await?;
                info!(access_token = %tokens.access, "Session refreshed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Refresh rejected, signing out");
                if let Err(clear) = self.logout().await {
                    error!(error = %clear, "Failed to clear session after rejected refresh");
                }
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Reloads the signed-in user from the server.
    ///
    /// # Errors
    /// Returns error if the request fails or the user cannot be stored.
    pub async fn fetch_current_user(&self) -> Result<SessionUser, ApiError> {
        self.begin();
        let result = async {
            let user = self.auth.current_user().await?;
            self.context.store_user(user.clone()).await?;
            Ok::<_, ApiError>(user)
        }
        .await;
        self.finish(result.as_ref().err());
        result
    }

    /// # Errors
    /// Returns validation error for an unusable new password, or the API error.
    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        if let Some(problem) = change.problem() {
            let error = ApiError::validation(problem);
            self.fail(&error);
            return Err(error);
        }

        self.begin();
        let result = self.auth.change_password(change).await;
        self.finish(result.as_ref().err());
        if result.is_ok() {
            info!("Password changed");
        }
        result
    }

    /// Whether a session is held.
    pub async fn is_authenticated(&self) -> bool {
        self.context.is_authenticated().await
    }

    /// Signed-in user, if any.
    pub async fn user(&self) -> Option<SessionUser> {
        self.context.user().await
    }

    /// Message of the last failed operation.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    /// Forgets the last error.
    pub fn clear_error(&self) {
        self.state.lock().error = None;
    }

    /// Whether an operation is running.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    fn begin(&self) {
        let mut state = self.state.lock();
        state.loading = true;
        state.error = None;
    }

    fn finish(&self, error: Option<&ApiError>) {
        let mut state = self.state.lock();
        state.loading = false;
        state.error = error.map(displayed_message);
    }

    fn fail(&self, error: &ApiError) {
        self.state.lock().error = Some(displayed_message(error));
    }
}

fn displayed_message(error: &ApiError) -> String {
    error
        .server_message()
        .map_or_else(|| user_message(error), str::to_string)
}
