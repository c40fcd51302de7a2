//! Route tracking for the terminal back-office.

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::ports::NavigatorPort;

/// Holds the route the current command runs under.
///
/// CLI commands that act on the back-office enter a route under the admin
/// path; a forced redirect to the login route is recorded so the command can
/// tell the user to sign in again.
pub struct RouteTracker {
    current: RwLock<String>,
    redirected: RwLock<Option<String>>,
}

impl RouteTracker {
    /// Tracker starting on `route`.
    #[must_use]
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            current: RwLock::new(route.into()),
            redirected: RwLock::new(None),
        }
    }

    /// Enters a route without counting it as a redirect.
    pub fn enter(&self, route: impl Into<String>) {
        *self.current.write() = route.into();
    }

    /// Route forced by the last redirect, if any.
    #[must_use]
    pub fn redirected_to(&self) -> Option<String> {
        self.redirected.read().clone()
    }
}

impl Default for RouteTracker {
    fn default() -> Self {
        Self::new("/")
    }
}

impl NavigatorPort for RouteTracker {
    fn current_route(&self) -> String {
        self.current.read().clone()
    }

    fn navigate(&self, route: &str) {
        debug!(from = %self.current.read(), to = route, "Navigating");
        *self.current.write() = route.to_string();
        *self.redirected.write() = Some(route.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_is_not_a_redirect() {
        let tracker = RouteTracker::default();
        tracker.enter("/admin/posts");

        assert_eq!(tracker.current_route(), "/admin/posts");
        assert!(tracker.redirected_to().is_none());
    }

    #[test]
    fn test_navigate_records_redirect() {
        let tracker = RouteTracker::new("/admin/posts");
        tracker.navigate("/admin/login");

        assert_eq!(tracker.current_route(), "/admin/login");
        assert_eq!(tracker.redirected_to().as_deref(), Some("/admin/login"));
    }
}
