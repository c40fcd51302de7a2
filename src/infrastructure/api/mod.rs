//! Portfolio REST API adapters.

mod auth;
mod client;
mod content;
pub mod dto;
mod error_sink;
mod refresh;
mod request;
mod upload;

pub use auth::AuthApi;
pub use client::{ApiClient, ApiClientConfig};
pub use content::{ContentApi, ResourceApi};
pub use error_sink::{ApiErrorSink, DEFAULT_SINK_PATH};
pub use request::ApiRequest;
pub use upload::{UPLOAD_TIMEOUT, UploadApi};
