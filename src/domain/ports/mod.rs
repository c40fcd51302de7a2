//! Ports the domain depends on, implemented by the infrastructure layer.

mod auth_port;
mod error_sink_port;
mod navigator_port;
mod storage_port;
mod upload_port;

pub use auth_port::AuthPort;
pub use error_sink_port::ErrorSinkPort;
pub use navigator_port::NavigatorPort;
pub use storage_port::{StorageKey, StoragePort};
pub use upload_port::UploadPort;
