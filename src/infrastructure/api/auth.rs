//! `/auth/*` endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::client::ApiClient;
use super::dto::LoginData;
use super::request::ApiRequest;
use crate::domain::entities::{
    AuthSession, AuthToken, Credentials, PasswordChange, SessionUser, TokenPair,
};
use crate::domain::errors::ApiError;
use crate::domain::ports::AuthPort;

/// [`AuthPort`] backed by the REST API.
pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    /// Wraps `client`.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthPort for AuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, ApiError> {
        debug!(email = credentials.email(), "Logging in");

        let request = ApiRequest::post("/auth/login")
            .without_refresh()
            .json(credentials)?;
        let data: LoginData = self.client.data(request).await?;

        let access = AuthToken::new(data.access_token)
            .ok_or_else(|| ApiError::decode("login response carried an empty access token"))?;
        let refresh = AuthToken::new(data.refresh_token)
            .ok_or_else(|| ApiError::decode("login response carried an empty refresh token"))?;

        info!(user_id = data.user.id(), role = ?data.user.role(), "Login accepted");

        Ok(AuthSession {
            user: data.user,
            tokens: TokenPair::new(access, refresh),
        })
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.client
            .send(ApiRequest::post("/auth/logout").without_refresh())
            .await
    }

    async fn refresh(&self) -> Result<TokenPair, ApiError> {
        self.client.refresh_session().await
    }

    async fn current_user(&self) -> Result<SessionUser, ApiError> {
        self.client.data(ApiRequest::get("/auth/me")).await
    }

    async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        let request = ApiRequest::post("/auth/change-password").json(change)?;
        self.client.send(request).await
    }
}
