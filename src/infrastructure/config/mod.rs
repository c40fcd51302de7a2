//! Application configuration.

pub mod app_config;
pub mod args;
pub mod storage;

pub use app_config::{
    API_URL_ENV, ApiConfig, AppConfig, Environment, ErrorsConfig, LogLevel, StorageBackend,
    StorageConfig, ToastConfig, UploadConfig,
};
pub use args::{CliArgs, Command, Payload, ResourceKind};
pub use storage::{ConfigError, StorageManager};
