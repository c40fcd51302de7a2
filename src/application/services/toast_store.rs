//! Toast notification queue.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::toast::{DEFAULT_TOAST_DURATION, Toast, ToastId, ToastKind};

/// Short-lived user notifications, oldest first.
///
/// Toasts leave the list once their duration has elapsed or when dismissed.
/// Expiry is checked against the tokio clock whenever the list is read.
#[derive(Debug, Clone)]
pub struct ToastStore {
    queue: Arc<Mutex<VecDeque<Toast>>>,
    default_duration: Duration,
}

impl Default for ToastStore {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl ToastStore {
    /// Empty queue whose toasts live for `default_duration`.
    #[must_use]
    pub fn new(default_duration: Duration) -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            default_duration,
        }
    }

    /// Queues a toast and returns its id.
    pub fn show_toast(&self, message: impl Into<String>, kind: ToastKind) -> ToastId {
        let toast = Toast::new(message, kind).with_duration(self.default_duration);
        let id = toast.id;
        debug!(id = %id, kind = ?kind, message = %toast.message, "Toast shown");
        self.queue.lock().push_back(toast);
        id
    }

    /// Queues a success toast.
    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.show_toast(message, ToastKind::Success)
    }

    /// Queues an error toast.
    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.show_toast(message, ToastKind::Error)
    }

    /// Queues a warning toast.
    pub fn warning(&self, message: impl Into<String>) -> ToastId {
        self.show_toast(message, ToastKind::Warning)
    }

    /// Queues an info toast.
    pub fn info(&self, message: impl Into<String>) -> ToastId {
        self.show_toast(message, ToastKind::Info)
    }

    /// Removes a toast; unknown ids are ignored.
    pub fn dismiss(&self, id: ToastId) {
        self.queue.lock().retain(|toast| toast.id != id);
    }

    /// Drops every toast.
    pub fn clear(&self) {
        self.queue.lock().clear();
    }

    /// Live toasts in insertion order.
    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        let now = Instant::now();
        let mut queue = self.queue.lock();
        queue.retain(|toast| !toast.is_expired_at(now));
        queue.iter().cloned().collect()
    }

    /// Drains every live toast, for one-shot output.
    #[must_use]
    pub fn take(&self) -> Vec<Toast> {
        let now = Instant::now();
        self.queue
            .lock()
            .drain(..)
            .filter(|toast| !toast.is_expired_at(now))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_toast_visible_then_gone_after_duration() {
        let store = ToastStore::default();

        let id = store.show_toast("x", ToastKind::Success);
        let toasts = store.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].id, id);
        assert_eq!(toasts[0].kind, ToastKind::Success);

        tokio::time::advance(Duration::from_millis(2999)).await;
        assert_eq!(store.toasts().len(), 1);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(store.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_insertion_order_and_dismiss() {
        let store = ToastStore::default();
        store.info("first");
        let second = store.warning("second");
        store.error("third");

        store.dismiss(second);
        store.dismiss(ToastId::new());

        let messages: Vec<_> = store.toasts().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, vec!["first", "third"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_queue() {
        let store = ToastStore::new(Duration::from_secs(10));
        let handle = store.clone();
        handle.success("saved");

        assert_eq!(store.toasts().len(), 1);
        store.clear();
        assert!(handle.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_take_drains() {
        let store = ToastStore::default();
        store.info("a");

        assert_eq!(store.take().len(), 1);
        assert!(store.toasts().is_empty());
    }
}
