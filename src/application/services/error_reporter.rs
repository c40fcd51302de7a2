//! Client error reporting.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::domain::entities::ErrorRecord;
use crate::domain::errors::{ApiError, StorageError};
use crate::domain::ports::{ErrorSinkPort, NavigatorPort, StorageKey, StoragePort};

/// Records kept under `errorLogs`.
pub const MAX_STORED_ERRORS: usize = 5;

struct Shipping {
    sink: Arc<dyn ErrorSinkPort>,
    storage: Arc<dyn StoragePort>,
}

/// Logs failures and, in production, ships them to the backend.
///
/// Reporting never fails: sink and storage errors are logged and dropped.
pub struct ErrorReporter {
    navigator: Arc<dyn NavigatorPort>,
    user_agent: String,
    shipping: Option<Shipping>,
}

impl ErrorReporter {
    /// Reporter that only logs.
    #[must_use]
    pub fn development(navigator: Arc<dyn NavigatorPort>, user_agent: impl Into<String>) -> Self {
        Self {
            navigator,
            user_agent: user_agent.into(),
            shipping: None,
        }
    }

    /// Reporter that also posts to `sink` and keeps the last records in `storage`.
    #[must_use]
    pub fn production(
        navigator: Arc<dyn NavigatorPort>,
        user_agent: impl Into<String>,
        sink: Arc<dyn ErrorSinkPort>,
        storage: Arc<dyn StoragePort>,
    ) -> Self {
        Self {
            navigator,
            user_agent: user_agent.into(),
            shipping: Some(Shipping { sink, storage }),
        }
    }

    /// Whether reports are sent to the backend.
    #[must_use]
    pub const fn is_shipping(&self) -> bool {
        self.shipping.is_some()
    }

    /// Records a failure.
    pub async fn report(&self, message: impl Into<String>, context: Option<&str>) -> ErrorRecord {
        let mut record = ErrorRecord::new(
            message,
            self.navigator.current_route(),
            self.user_agent.clone(),
        );
        if let Some(context) = context {
            record = record.with_context(context);
        }

        error!(
            id = %record.id,
            url = %record.url,
            context = record.context.as_deref(),
            "{}",
            record.message
        );

        if let Some(shipping) = &self.shipping {
            if let Err(e) = shipping.sink.send(&record).await {
                debug!(error = %e, "Error sink unreachable");
            }
            if let Err(e) = append(shipping.storage.as_ref(), &record).await {
                warn!(error = %e, "Failed to keep error record");
            }
        }

        record
    }

    /// Records an API failure with its status in the context.
    pub async fn report_api_error(&self, error: &ApiError, context: &str) -> ErrorRecord {
        let context = match error.status_code() {
            Some(status) => format!("{context} (HTTP {status})"),
            None => context.to_string(),
        };
        self.report(error.to_string(), Some(&context)).await
    }

    /// Records retained locally, oldest first.
    ///
    /// # Errors
    /// Returns error if storage cannot be read.
    pub async fn recent(&self) -> Result<Vec<ErrorRecord>, StorageError> {
        match &self.shipping {
            Some(shipping) => load(shipping.storage.as_ref()).await,
            None => Ok(Vec::new()),
        }
    }

    /// Drops every retained record.
    ///
    /// # Errors
    /// Returns error if storage rejects the removal.
    pub async fn clear(&self) -> Result<(), StorageError> {
        match &self.shipping {
            Some(shipping) => shipping.storage.remove(StorageKey::ErrorLogs).await,
            None => Ok(()),
        }
    }
}

async fn load(storage: &dyn StoragePort) -> Result<Vec<ErrorRecord>, StorageError> {
    let Some(raw) = storage.get(StorageKey::ErrorLogs).await? else {
        return Ok(Vec::new());
    };
    Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(error = %e, "Discarding unreadable error log");
        Vec::new()
    }))
}

async fn append(storage: &dyn StoragePort, record: &ErrorRecord) -> Result<(), StorageError> {
    let mut records = load(storage).await?;
    records.push(record.clone());
    if records.len() > MAX_STORED_ERRORS {
        let excess = records.len() - MAX_STORED_ERRORS;
        records.drain(..excess);
    }

    let raw = serde_json::to_string(&records)
        .map_err(|e| StorageError::WriteFailed(format!("failed to encode error log: {e}")))?;
    storage.set(StorageKey::ErrorLogs, &raw).await
}
