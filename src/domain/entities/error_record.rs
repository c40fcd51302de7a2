//! Client-side error report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One reported failure with the context it happened in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    /// Unique id.
    pub id: String,
    /// Error message.
    pub message: String,
    /// Where the error was caught.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Route active at the time.
    pub url: String,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
    /// Client identification.
    pub user_agent: String,
}

impl ErrorRecord {
    /// Creates record stamped with the current time.
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        url: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            message: message.into(),
            context: None,
            url: url.into(),
            timestamp: Utc::now(),
            user_agent: user_agent.into(),
        }
    }

    /// Adds where the error was caught.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}
