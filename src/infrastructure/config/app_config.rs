//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::args::CliArgs;

const APP_NAME: &str = "portfolio-admin";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "portfolio";

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "PORTFOLIO_API_URL";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Where the session is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON file in the data directory.
    #[default]
    File,
    /// System keyring.
    Keyring,
    /// Process memory only; nothing survives exit.
    Memory,
}

/// Deployment environment, selects how errors are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Errors are logged locally only.
    #[default]
    Development,
    /// Errors are also shipped to the backend and kept in `errorLogs`.
    Production,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// API connection.
    #[serde(default)]
    pub api: ApiConfig,

    /// Session persistence.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Toast behavior.
    #[serde(default)]
    pub toast: ToastConfig,

    /// Upload validation.
    #[serde(default)]
    pub upload: UploadConfig,

    /// Error reporting.
    #[serde(default)]
    pub errors: ErrorsConfig,
}

/// API connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root including any `/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Default request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Route prefix of the back-office.
    #[serde(default = "default_admin_path")]
    pub admin_path: String,

    /// Route forced when the session expires.
    #[serde(default = "default_login_route")]
    pub login_route: String,
}

impl ApiConfig {
    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            admin_path: default_admin_path(),
            login_route: default_login_route(),
        }
    }
}

/// Session storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Where the session is kept.
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the session file; the platform data directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Toast configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToastConfig {
    /// Lifetime of a toast in milliseconds.
    #[serde(default = "default_toast_duration_ms")]
    pub duration_ms: u64,
}

impl ToastConfig {
    /// Toast lifetime.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_toast_duration_ms(),
        }
    }
}

/// Upload validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted file in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,

    /// Accepted MIME types.
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,

    /// Fall back to an inline data URL when the upload endpoint is missing.
    #[serde(default)]
    pub inline_fallback: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            allowed_types: default_allowed_types(),
            inline_fallback: false,
        }
    }
}

/// Error reporting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorsConfig {
    /// Reports are only shipped in production.
    #[serde(default)]
    pub environment: Environment,

    /// Backend path receiving reports in production.
    #[serde(default = "default_sink_path")]
    pub sink_path: String,
}

impl Default for ErrorsConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            sink_path: default_sink_path(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_admin_path() -> String {
    "/admin".to_string()
}

fn default_login_route() -> String {
    "/admin/login".to_string()
}

const fn default_toast_duration_ms() -> u64 {
    3000
}

const fn default_max_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_allowed_types() -> Vec<String> {
    ["image/jpeg", "image/png", "image/webp", "image/gif"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_sink_path() -> String {
    "/logs/client-errors".to_string()
}

impl AppConfig {
    /// Applies environment overrides on top of file values.
    pub fn apply_env(&mut self) {
        self.apply_api_url(std::env::var(API_URL_ENV).ok());
    }

    fn apply_api_url(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|url| !url.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
    }

    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(api_url) = &args.api_url {
            self.api.base_url.clone_from(api_url);
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_secs = timeout;
        }
        if let Some(backend) = args.storage {
            self.storage.backend = backend;
        }
        if let Some(environment) = args.environment {
            self.errors.environment = environment;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default data directory.
    #[must_use]
    pub fn default_data_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        Self::default_data_dir().map(|dir| dir.join("portfolio-admin.log"))
    }

    /// Returns effective data directory.
    #[must_use]
    pub fn effective_data_dir(&self) -> Option<PathBuf> {
        self.storage.data_dir.clone().or_else(Self::default_data_dir)
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"

            [api]
            base_url = "https://api.example.com/api"

            [upload]
            max_bytes = 1048576
            inline_fallback = true

            [errors]
            environment = "production"
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.api.base_url, "https://api.example.com/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.upload.max_bytes, 1_048_576);
        assert_eq!(config.upload.allowed_types.len(), 4);
        assert!(config.upload.inline_fallback);
        assert_eq!(config.errors.environment, Environment::Production);
        assert_eq!(config.errors.sink_path, "/logs/client-errors");
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.toast.duration(), Duration::from_millis(3000));
        assert_eq!(config.upload.max_bytes, 5 * 1024 * 1024);
        assert!(!config.upload.inline_fallback);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.api.login_route, "/admin/login");
    }

    #[test]
    fn test_env_url_overrides_file_and_blank_is_ignored() {
        let mut config = AppConfig::default();

        config.apply_api_url(Some("  ".into()));
        assert_eq!(config.api.base_url, default_base_url());

        config.apply_api_url(Some("https://env.example.com/api".into()));
        assert_eq!(config.api.base_url, "https://env.example.com/api");
    }

    #[test]
    fn test_cli_overrides_env() {
        let mut config = AppConfig::default();
        config.apply_api_url(Some("https://env.example.com/api".into()));

        let args = CliArgs::parse_from([
            "portfolio-admin",
            "--api-url",
            "https://cli.example.com/api",
            "--storage",
            "memory",
            "whoami",
        ]);
        config.merge_with_args(&args);

        assert_eq!(config.api.base_url, "https://cli.example.com/api");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }
}
