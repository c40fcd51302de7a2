//! Single-flight token refresh.

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tracing::debug;

use crate::domain::entities::TokenPair;
use crate::domain::errors::ApiError;

pub(crate) type RefreshOutcome = Result<TokenPair, ApiError>;
type PendingRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Holds the refresh currently in flight, if any.
///
/// The first caller starts the refresh; callers arriving while it is pending
/// await the same future and receive a clone of its outcome. The slot is
/// emptied once the refresh settles, so the next expiry starts a new one.
#[derive(Default)]
pub(crate) struct RefreshGate {
    pending: Mutex<Option<PendingRefresh>>,
}

impl RefreshGate {
    pub(crate) async fn run<F>(&self, start: F) -> RefreshOutcome
    where
        F: FnOnce() -> BoxFuture<'static, RefreshOutcome>,
    {
        let refresh = {
            let mut slot = self.pending.lock();
            if let Some(pending) = slot.as_ref() {
                debug!("Joining token refresh already in flight");
                pending.clone()
            } else {
                let pending = start().shared();
                *slot = Some(pending.clone());
                pending
            }
        };

        let outcome = refresh.clone().await;

        let mut slot = self.pending.lock();
        if slot.as_ref().is_some_and(|pending| pending.ptr_eq(&refresh)) {
            *slot = None;
        }

        outcome
    }

    #[cfg(test)]
    pub(crate) fn is_idle(&self) -> bool {
        self.pending.lock().is_none()
    }
}
