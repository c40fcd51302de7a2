//! Backend error report sink.

use std::sync::Arc;

use async_trait::async_trait;

use super::client::ApiClient;
use super::request::ApiRequest;
use crate::domain::entities::ErrorRecord;
use crate::domain::errors::ApiError;
use crate::domain::ports::ErrorSinkPort;

/// Default backend path receiving client error reports.
pub const DEFAULT_SINK_PATH: &str = "/logs/client-errors";

/// [`ErrorSinkPort`] posting reports to the backend.
pub struct ApiErrorSink {
    client: Arc<ApiClient>,
    path: String,
}

impl ApiErrorSink {
    /// Sink posting to `path` under the API base URL.
    #[must_use]
    pub fn new(client: Arc<ApiClient>, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }
}

#[async_trait]
impl ErrorSinkPort for ApiErrorSink {
    async fn send(&self, record: &ErrorRecord) -> Result<(), ApiError> {
        let request = ApiRequest::post(self.path.as_str())
            .without_refresh()
            .json(record)?;
        self.client.send(request).await
    }
}
