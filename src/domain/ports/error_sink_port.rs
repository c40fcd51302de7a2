//! Error report sink port definition.

use async_trait::async_trait;

use crate::domain::entities::ErrorRecord;
use crate::domain::errors::ApiError;

/// Port for shipping error reports to the backend.
#[async_trait]
pub trait ErrorSinkPort: Send + Sync {
    /// Sends one report.
    async fn send(&self, record: &ErrorRecord) -> Result<(), ApiError>;
}

#[cfg(test)]
#[allow(dead_code, missing_docs)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockErrorSink {
        pub records: Mutex<Vec<ErrorRecord>>,
        pub fail: bool,
    }

    impl MockErrorSink {
        pub fn failing() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl ErrorSinkPort for MockErrorSink {
        async fn send(&self, record: &ErrorRecord) -> Result<(), ApiError> {
            if self.fail {
                return Err(ApiError::network("sink unreachable"));
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }
}
