//! Upload DTOs.

/// Outcome of checking a file before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the file may be uploaded.
    pub valid: bool,
    /// Reason for rejection, shown to the user.
    pub error: Option<String>,
}

impl ValidationResult {
    /// Accepted file.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    /// Rejected file.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(reason.into()),
        }
    }
}

/// Phase of an upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadStatus {
    /// Nothing selected yet.
    #[default]
    Idle,
    /// Request in flight.
    Uploading,
    /// Server stored the file.
    Done,
    /// Validation or upload failed; retry is possible for upload failures.
    Failed,
}

/// Observable state of an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadState {
    /// Current phase.
    pub status: UploadStatus,
    /// Simulated progress in percent.
    pub progress: u8,
    /// Image shown to the user: local data URL, then the server URL.
    pub preview: Option<String>,
    /// Server URL after success.
    pub url: Option<String>,
    /// Message of the last failure.
    pub error: Option<String>,
}

impl UploadState {
    /// Whether a request is in flight.
    #[must_use]
    pub fn is_uploading(&self) -> bool {
        self.status == UploadStatus::Uploading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_result_constructors() {
        assert!(ValidationResult::ok().valid);
        let rejected = ValidationResult::rejected("too big");
        assert!(!rejected.valid);
        assert_eq!(rejected.error.as_deref(), Some("too big"));
    }
}
