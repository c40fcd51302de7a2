//! Infrastructure layer with external service adapters.

/// REST API adapters.
pub mod api;
/// Application configuration.
pub mod config;
/// Route tracking for the command-line front end.
pub mod navigation;
/// Key-value storage adapters.
pub mod storage;

pub use api::{ApiClient, ApiClientConfig, ApiErrorSink, AuthApi, ContentApi, UploadApi};
pub use config::{AppConfig, CliArgs, LogLevel, StorageManager};
pub use navigation::RouteTracker;
pub use storage::{FileStorage, KeyringStorage, MemoryStorage};
