//! Portfolio REST API client.

use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use reqwest::{Client, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use super::dto::{ApiEnvelope, ErrorEnvelope, RefreshBody, TokenData};
use super::refresh::{RefreshGate, RefreshOutcome};
use super::request::ApiRequest;
use crate::domain::entities::{AuthToken, Page, TokenPair};
use crate::domain::errors::ApiError;
use crate::domain::ports::NavigatorPort;
use crate::domain::services::SessionContext;

const USER_AGENT: &str = concat!("portfolio-admin/", env!("CARGO_PKG_VERSION"));
const REFRESH_PATH: &str = "/auth/refresh";

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// API root, e.g. `https://api.example.com/api`.
    pub base_url: String,
    /// Default per-request timeout.
    pub timeout: Duration,
    /// Route prefix of the back-office.
    pub admin_path: String,
    /// Route to force when the session is lost inside the back-office.
    pub login_route: String,
}

impl ApiClientConfig {
    /// Creates config with defaults for everything but the base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            admin_path: "/admin".to_string(),
            login_route: "/admin/login".to_string(),
        }
    }
}

#[derive(Clone)]
struct SessionRoutes {
    admin_path: String,
    login_route: String,
}

/// HTTP client that stamps bearer tokens and transparently refreshes them.
///
/// Each request carries the stored access token when there is one. A 401 on
/// a request that has not been replayed yet triggers one refresh through
/// `/auth/refresh` (shared with any other request failing at the same time)
/// followed by exactly one replay with the new token. If the refresh cannot
/// happen the session is cleared, the user is sent to the login route when
/// inside the back-office, and the refresh error is returned.
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<SessionContext>,
    navigator: Arc<dyn NavigatorPort>,
    routes: SessionRoutes,
    refresh: RefreshGate,
}

impl ApiClient {
    /// Creates client.
    ///
    /// # Errors
    /// Returns error if the base URL is empty or the HTTP client cannot be built.
    pub fn new(
        config: ApiClientConfig,
        session: Arc<SessionContext>,
        navigator: Arc<dyn NavigatorPort>,
    ) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::configuration("API base URL is required"));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static("ar"),
        );

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            session,
            navigator,
            routes: SessionRoutes {
                admin_path: config.admin_path,
                login_route: config.login_route,
            },
            refresh: RefreshGate::default(),
        })
    }

    /// API base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Session shared with the services.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Sends a request, refreshing the access token once on 401.
    ///
    /// # Errors
    /// Returns error on network failure, non-success status, or failed refresh.
    pub async fn execute(&self, mut request: ApiRequest) -> Result<Response, ApiError> {
        let sent_token = self.session.access_token().await;
        let response = self.dispatch(&request, sent_token.as_ref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED || !request.can_refresh() {
            return Self::check_status(response).await;
        }

        request.mark_retried();
        debug!(
            method = %request.method(),
            path = request.path(),
            "Access token rejected, refreshing"
        );

        let token = self.renew_access_token(sent_token.as_ref()).await?;
        let response = self.dispatch(&request, Some(&token)).await?;
        Self::check_status(response).await
    }

    /// Sends a request and unwraps the envelope's `data`.
    ///
    /// # Errors
    /// Returns error if the request fails or the body does not decode.
    pub async fn data<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        Ok(self.envelope(request).await?.data)
    }

    /// Sends a list request and returns the items with pagination.
    ///
    /// # Errors
    /// Returns error if the request fails or the body does not decode.
    pub async fn page<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Page<T>, ApiError> {
        let envelope = self.envelope::<Vec<T>>(request).await?;
        Ok(Page::new(envelope.data, envelope.meta))
    }

    /// Sends a request whose body is irrelevant.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn send(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.execute(request).await.map(|_| ())
    }

    async fn envelope<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let path = request.path().to_string();
        let response = self.execute(request).await?;
        response.json::<ApiEnvelope<T>>().await.map_err(|e| {
            warn!(path = %path, error = %e, "Failed to decode response");
            ApiError::decode(e.to_string())
        })
    }

    /// Renews the stored token pair through the shared refresh gate.
    ///
    /// Joins the refresh already in flight if there is one, so the interceptor
    /// and explicit callers never spend the same refresh token twice. On
    /// failure the session is expired as for a 401.
    ///
    /// # Errors
    /// Returns [`ApiError::NoRefreshToken`] when none is held, or the refresh error.
    pub async fn refresh_session(&self) -> Result<TokenPair, ApiError> {
        let http = self.http.clone();
        let base_url = self.base_url.clone();
        let session = Arc::clone(&self.session);
        let navigator = Arc::clone(&self.navigator);
        let routes = self.routes.clone();

        self.refresh
            .run(move || renew_session(http, base_url, session, navigator, routes).boxed())
            .await
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&AuthToken>,
    ) -> Result<Response, ApiError> {
        request
            .build(&self.http, &self.base_url, token)?
            .send()
            .await
            .map_err(|e| map_transport_error(&e))
    }

    async fn renew_access_token(&self, sent: Option<&AuthToken>) -> Result<AuthToken, ApiError> {
        if let Some(current) = self.session.access_token().await {
            if sent != Some(&current) {
                debug!("Access token changed while request was in flight, replaying");
                return Ok(current);
            }
        }

        self.refresh_session().await.map(|tokens| tokens.access)
    }

    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let fallback = status
            .canonical_reason()
            .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_string);

        let (message, error) = match response.json::<ErrorEnvelope>().await {
            Ok(envelope) if !envelope.message.is_empty() => (envelope.message, envelope.error),
            Ok(envelope) => (fallback, envelope.error),
            Err(_) => (fallback, None),
        };

        debug!(status = status.as_u16(), message = %message, "API returned error status");

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
            error,
        })
    }
}

fn map_transport_error(e: &reqwest::Error) -> ApiError {
    warn!(error = %e, "Failed to reach API");
    if e.is_timeout() {
        ApiError::Timeout
    } else if e.is_connect() {
        ApiError::network("failed to connect to API")
    } else {
        ApiError::network(e.to_string())
    }
}

async fn exchange_refresh_token(
    http: &Client,
    base_url: &str,
    refresh: &AuthToken,
) -> Result<TokenPair, ApiError> {
    let response = ApiRequest::post(REFRESH_PATH)
        .without_refresh()
        .json(&RefreshBody {
            refresh_token: refresh.as_str(),
        })?
        .build(http, base_url, None)?
        .send()
        .await
        .map_err(|e| map_transport_error(&e))?;

    let response = ApiClient::check_status(response).await?;
    let envelope = response
        .json::<ApiEnvelope<TokenData>>()
        .await
        .map_err(|e| ApiError::decode(e.to_string()))?;

    envelope
        .data
        .into_pair(refresh)
        .ok_or_else(|| ApiError::decode("refresh response carried an empty access token"))
}

async fn renew_session(
    http: Client,
    base_url: String,
    session: Arc<SessionContext>,
    navigator: Arc<dyn NavigatorPort>,
    routes: SessionRoutes,
) -> RefreshOutcome {
    let Some(refresh) = session.refresh_token().await else {
        warn!("No refresh token held, session cannot be renewed");
        expire_session(&session, navigator.as_ref(), &routes).await;
        return Err(ApiError::NoRefreshToken);
    };

    match exchange_refresh_token(&http, &base_url, &refresh).await {
        Ok(tokens) => {
            session.store_tokens(&tokens).await?;
            info!(access_token = %tokens.access, "Access token refreshed");
            Ok(tokens)
        }
        Err(e) => {
            warn!(error = %e, "Token refresh failed");
            expire_session(&session, navigator.as_ref(), &routes).await;
            Err(e)
        }
    }
}

async fn expire_session(
    session: &SessionContext,
    navigator: &dyn NavigatorPort,
    routes: &SessionRoutes,
) {
    if let Err(e) = session.clear().await {
        error!(error = %e, "Failed to clear expired session from storage");
    }

    let current = navigator.current_route();
    if current.starts_with(&routes.admin_path) && current != routes.login_route {
        info!(from = %current, to = %routes.login_route, "Session expired, redirecting to login");
        navigator.navigate(&routes.login_route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::{MockNavigator, MockStorage};

    fn context() -> Arc<SessionContext> {
        Arc::new(SessionContext::new(Arc::new(MockStorage::new())))
    }

    #[test]
    fn test_client_creation_trims_base_url() {
        let client = ApiClient::new(
            ApiClientConfig::new("http://localhost:3000/api/ "),
            context(),
            Arc::new(MockNavigator::at("/")),
        )
        .unwrap();

        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let result = ApiClient::new(
            ApiClientConfig::new("  "),
            context(),
            Arc::new(MockNavigator::at("/")),
        );
        assert!(matches!(result, Err(ApiError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_expire_session_redirects_inside_admin() {
        let navigator = MockNavigator::at("/admin/posts");
        let routes = SessionRoutes {
            admin_path: "/admin".into(),
            login_route: "/admin/login".into(),
        };

        expire_session(&context(), &navigator, &routes).await;

        assert_eq!(navigator.current_route(), "/admin/login");
    }

    #[tokio::test]
    async fn test_expire_session_leaves_public_routes() {
        let navigator = MockNavigator::at("/blog");
        let routes = SessionRoutes {
            admin_path: "/admin".into(),
            login_route: "/admin/login".into(),
        };

        expire_session(&context(), &navigator, &routes).await;

        assert_eq!(navigator.current_route(), "/blog");
        assert!(navigator.history.lock().unwrap().is_empty());
    }
}
