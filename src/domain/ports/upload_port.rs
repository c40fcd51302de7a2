//! Upload port definition.

use async_trait::async_trait;

use crate::domain::entities::{LocalFile, UploadKind, UploadedFile};
use crate::domain::errors::ApiError;

/// Port for the `/upload/*` endpoints.
#[async_trait]
pub trait UploadPort: Send + Sync {
    /// Sends the file as multipart form data.
    async fn upload(&self, kind: UploadKind, file: &LocalFile) -> Result<UploadedFile, ApiError>;
}

#[cfg(test)]
#[allow(missing_docs)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Upload mock answering from a queue of scripted results.
    pub struct MockUploadPort {
        calls: AtomicUsize,
        results: Mutex<Vec<Result<UploadedFile, ApiError>>>,
        delay: Duration,
    }

    impl MockUploadPort {
        pub fn new(results: Vec<Result<UploadedFile, ApiError>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                results: Mutex::new(results.into_iter().rev().collect()),
                delay: Duration::ZERO,
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn succeeding(url: &str) -> Self {
            Self::new(vec![Ok(uploaded(url))])
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    pub fn uploaded(url: &str) -> UploadedFile {
        UploadedFile {
            url: url.to_string(),
            file_name: None,
            size: None,
            mime_type: None,
        }
    }

    #[async_trait]
    impl UploadPort for MockUploadPort {
        async fn upload(&self, _kind: UploadKind, _file: &LocalFile) -> Result<UploadedFile, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.results
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(ApiError::status(500, "no scripted result")))
        }
    }
}
