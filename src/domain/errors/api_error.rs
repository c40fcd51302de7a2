//! API error types.

use thiserror::Error;

use super::StorageError;

/// Errors surfaced by the REST API client and the services built on it.
///
/// Variants carry owned strings so one refresh outcome can be cloned to every
/// request waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum ApiError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("request timed out")]
    Timeout,

    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        error: Option<String>,
    },

    #[error("no refresh token available")]
    NoRefreshToken,

    #[error("failed to decode response: {message}")]
    Decode { message: String },

    #[error("validation failed: {message}")]
    Validation { message: String },

    #[error("local storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("invalid client configuration: {message}")]
    Configuration { message: String },
}

impl ApiError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates status error.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
            error: None,
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns the HTTP status if the server answered.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the message from the server's error envelope, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// Returns whether the server answered 401.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    /// Returns whether no response was received.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout)
    }

    /// Returns whether the failure means the session can no longer be used.
    #[must_use]
    pub const fn is_session_lost(&self) -> bool {
        matches!(self, Self::NoRefreshToken | Self::Status { status: 401, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessors() {
        let err = ApiError::status(404, "Post not found");
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.server_message(), Some("Post not found"));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_blank_server_message_is_ignored() {
        let err = ApiError::status(500, "  ");
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn test_session_lost() {
        assert!(ApiError::NoRefreshToken.is_session_lost());
        assert!(ApiError::status(401, "expired").is_session_lost());
        assert!(!ApiError::Timeout.is_session_lost());
        assert!(ApiError::Timeout.is_network_error());
    }
}
