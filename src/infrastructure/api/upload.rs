//! `/upload/*` endpoints.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use super::client::ApiClient;
use super::request::ApiRequest;
use crate::domain::entities::{LocalFile, UploadKind, UploadedFile};
use crate::domain::errors::ApiError;
use crate::domain::ports::UploadPort;

/// Uploads get a longer ceiling than ordinary requests.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

const FILE_FIELD: &str = "file";

/// [`UploadPort`] backed by the REST API.
pub struct UploadApi {
    client: Arc<ApiClient>,
    timeout: Duration,
}

impl UploadApi {
    /// Uploader using the default upload timeout.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            timeout: UPLOAD_TIMEOUT,
        }
    }

    /// Overrides the upload timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl UploadPort for UploadApi {
    async fn upload(&self, kind: UploadKind, file: &LocalFile) -> Result<UploadedFile, ApiError> {
        debug!(
            path = kind.path(),
            name = file.name(),
            mime = file.mime(),
            size = file.size(),
            "Uploading"
        );

        let request = ApiRequest::post(kind.path())
            .file(FILE_FIELD, file.clone())
            .timeout(self.timeout);
        let uploaded: UploadedFile = self.client.data(request).await?;

        info!(url = %uploaded.url, "Upload stored");
        Ok(uploaded)
    }
}
