//! Toast notifications.

use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

/// Default lifetime of a toast.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

/// Unique toast handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(Uuid);

impl ToastId {
    /// Random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ToastId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ToastId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
    /// Needs attention.
    Warning,
    /// Neutral notice.
    Info,
}

impl ToastKind {
    /// Glyph printed before the message.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Error => "✗",
            Self::Warning => "!",
            Self::Info => "i",
        }
    }
}

/// Short-lived notification.
#[derive(Debug, Clone)]
pub struct Toast {
    /// Handle for dismissal.
    pub id: ToastId,
    /// Text shown.
    pub message: String,
    /// Severity.
    pub kind: ToastKind,
    /// When it was shown.
    pub created_at: Instant,
    /// Time until it expires.
    pub duration: Duration,
}

impl Toast {
    /// Toast with the default duration.
    #[must_use]
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            id: ToastId::new(),
            message: message.into(),
            kind,
            created_at: Instant::now(),
            duration: DEFAULT_TOAST_DURATION,
        }
    }

    /// Overrides the lifetime.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Whether the toast has outlived its duration at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.duration
    }

    /// Whether the toast has expired now.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_creation() {
        let t = Toast::new("تم الحفظ", ToastKind::Success);
        assert_eq!(t.kind, ToastKind::Success);
        assert_eq!(t.message, "تم الحفظ");
        assert_eq!(t.duration, Duration::from_millis(3000));
    }

    #[test]
    fn test_toast_expiry_boundary() {
        let t = Toast::new("x", ToastKind::Info);
        assert!(!t.is_expired_at(t.created_at + Duration::from_millis(2999)));
        assert!(t.is_expired_at(t.created_at + Duration::from_millis(3000)));
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(ToastId::new(), ToastId::new());
    }
}
