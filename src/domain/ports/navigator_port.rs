//! Navigation port definition.

/// Port for route tracking and forced navigation.
pub trait NavigatorPort: Send + Sync {
    /// Route the user is currently on.
    fn current_route(&self) -> String;

    /// Replaces the current route.
    fn navigate(&self, route: &str);
}

#[cfg(test)]
#[allow(dead_code, missing_docs)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    pub struct MockNavigator {
        pub route: Mutex<String>,
        pub history: Mutex<Vec<String>>,
    }

    impl MockNavigator {
        pub fn at(route: &str) -> Self {
            Self {
                route: Mutex::new(route.to_string()),
                history: Mutex::new(Vec::new()),
            }
        }
    }

    impl NavigatorPort for MockNavigator {
        fn current_route(&self) -> String {
            self.route.lock().unwrap().clone()
        }

        fn navigate(&self, route: &str) {
            *self.route.lock().unwrap() = route.to_string();
            self.history.lock().unwrap().push(route.to_string());
        }
    }
}
