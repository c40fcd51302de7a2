//! Main application orchestrator.

use std::io::IsTerminal;
use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{debug, info, warn};

use crate::application::services::{
    ErrorReporter, ImageUploader, SessionStore, ToastStore, UploadPolicy, user_message,
};
use crate::domain::entities::UploadKind;
use crate::domain::errors::ApiError;
use crate::domain::ports::{NavigatorPort, StoragePort, UploadPort};
use crate::domain::services::SessionContext;
use crate::infrastructure::api::{
    ApiClient, ApiClientConfig, ApiErrorSink, AuthApi, ContentApi, UploadApi,
};
use crate::infrastructure::config::{AppConfig, Command, Environment, StorageBackend};
use crate::infrastructure::navigation::RouteTracker;
use crate::infrastructure::storage::{FileStorage, KeyringStorage, MemoryStorage};
use crate::presentation::commands;
use crate::presentation::ui::toast_view::render_toast;

const USER_AGENT: &str = concat!("portfolio-admin/", env!("CARGO_PKG_VERSION"));
const SIGN_IN_FIRST: &str = "يرجى تسجيل الدخول أولاً";
const SESSION_EXPIRED: &str = "انتهت الجلسة، يرجى تسجيل الدخول مرة أخرى";

/// Wires every adapter and service for one invocation.
pub struct App {
    config: AppConfig,
    navigator: Arc<RouteTracker>,
    pub(crate) session: SessionStore,
    pub(crate) content: ContentApi,
    uploads: Arc<dyn UploadPort>,
    pub(crate) reporter: ErrorReporter,
    pub(crate) toasts: ToastStore,
}

impl App {
    /// Builds the application from configuration.
    ///
    /// # Errors
    /// Returns error if storage cannot be located or the HTTP client cannot be built.
    pub fn new(config: AppConfig) -> Result<Self> {
        let storage = build_storage(&config)?;
        let context = Arc::new(SessionContext::new(Arc::clone(&storage)));
        let navigator = Arc::new(RouteTracker::default());

        let client = Arc::new(
            ApiClient::new(
                ApiClientConfig {
                    base_url: config.api.base_url.clone(),
                    timeout: config.api.timeout(),
                    admin_path: config.api.admin_path.clone(),
                    login_route: config.api.login_route.clone(),
                },
                Arc::clone(&context),
                navigator.clone(),
            )
            .wrap_err("Failed to create API client")?,
        );

        let reporter = match config.errors.environment {
            Environment::Development => ErrorReporter::development(navigator.clone(), USER_AGENT),
            Environment::Production => ErrorReporter::production(
                navigator.clone(),
                USER_AGENT,
                Arc::new(ApiErrorSink::new(
                    Arc::clone(&client),
                    config.errors.sink_path.clone(),
                )),
                storage,
            ),
        };

        info!(
            api = %client.base_url(),
            storage = ?config.storage.backend,
            environment = ?config.errors.environment,
            "Application configured"
        );

        Ok(Self {
            session: SessionStore::new(Arc::new(AuthApi::new(Arc::clone(&client))), context),
            content: ContentApi::new(Arc::clone(&client)),
            uploads: Arc::new(UploadApi::new(client)),
            toasts: ToastStore::new(config.toast.duration()),
            reporter,
            navigator,
            config,
        })
    }

    /// Runs one command between session restore and teardown.
    ///
    /// # Errors
    /// Returns the command's failure after it has been shown to the user.
    pub async fn run(&self, command: Command) -> Result<()> {
        self.session
            .init()
            .await
            .wrap_err("Failed to restore session")?;

        let route = command.route();
        self.navigator.enter(route);
        debug!(route, command = ?command, "Running command");

        let result = if self.requires_session(&command) && !self.session.is_authenticated().await {
            self.navigator.navigate(&self.config.api.login_route);
            self.toasts.warning(SIGN_IN_FIRST);
            Err(eyre!(SIGN_IN_FIRST))
        } else {
            commands::dispatch(self, command).await
        };

        if let Err(e) = &result {
            self.surface(e).await;
        }

        self.flush_toasts();

        if let Err(e) = self.session.teardown().await {
            warn!(error = %e, "Failed to flush session storage");
        }

        result
    }

    fn requires_session(&self, command: &Command) -> bool {
        !matches!(
            command,
            Command::Login { .. } | Command::Logout | Command::ErrorLogs { .. }
        ) && command.route().starts_with(&self.config.api.admin_path)
    }

    async fn surface(&self, error: &color_eyre::Report) {
        let Some(api_error) = error.downcast_ref::<ApiError>() else {
            self.toasts.error(error.to_string());
            return;
        };

        if self
            .navigator
            .redirected_to()
            .is_some_and(|route| route == self.config.api.login_route)
        {
            self.toasts.warning(SESSION_EXPIRED);
        } else {
            self.toasts.error(user_message(api_error));
        }

        if !matches!(api_error, ApiError::Validation { .. }) && !api_error.is_session_lost() {
            self.reporter
                .report_api_error(api_error, self.navigator.current_route().as_str())
                .await;
        }
    }

    fn flush_toasts(&self) {
        let ansi = std::io::stderr().is_terminal();
        for toast in self.toasts.take() {
            eprintln!("{}", render_toast(&toast, ansi));
        }
    }

    /// Uploader for `kind` built from the configured policy.
    pub(crate) fn uploader(&self, kind: UploadKind) -> ImageUploader {
        let policy = UploadPolicy {
            max_bytes: self.config.upload.max_bytes,
            allowed_types: match kind {
                UploadKind::Image => self.config.upload.allowed_types.clone(),
                UploadKind::File => Vec::new(),
            },
            inline_fallback: self.config.upload.inline_fallback && kind == UploadKind::Image,
        };
        ImageUploader::new(Arc::clone(&self.uploads), policy).with_kind(kind)
    }
}

fn build_storage(config: &AppConfig) -> Result<Arc<dyn StoragePort>> {
    Ok(match config.storage.backend {
        StorageBackend::File => {
            let dir = config
                .effective_data_dir()
                .ok_or_else(|| eyre!("Failed to determine data directory"))?;
            Arc::new(FileStorage::in_dir(&dir))
        }
        StorageBackend::Keyring => Arc::new(KeyringStorage::new()),
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config.api.base_url = "http://127.0.0.1:9/api".into();
        App::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_admin_command_without_session_is_refused() {
        let app = app();

        let result = app.run(Command::Stats).await;

        assert!(result.is_err());
        assert_eq!(app.navigator.current_route(), "/admin/login");
    }

    #[test]
    fn test_session_requirements() {
        let app = app();
        assert!(!app.requires_session(&Command::Logout));
        assert!(!app.requires_session(&Command::ErrorLogs { clear: false }));
        assert!(app.requires_session(&Command::Whoami));
        assert!(app.requires_session(&Command::MarkRead { id: "1".into() }));
    }

    #[test]
    fn test_file_uploads_skip_type_allow_list() {
        let app = app();
        assert!(!app.uploader(UploadKind::Image).policy().allowed_types.is_empty());
        assert!(app.uploader(UploadKind::File).policy().allowed_types.is_empty());
    }
}
