//! Application services.

pub mod error_messages;
mod error_reporter;
mod image_upload;
mod session_store;
mod toast_store;

pub use error_messages::{status_message, user_message};
pub use error_reporter::{ErrorReporter, MAX_STORED_ERRORS};
pub use image_upload::{
    DEFAULT_ALLOWED_TYPES, DEFAULT_MAX_BYTES, ImageUploader, UploadPolicy, data_url,
};
pub use session_store::SessionStore;
pub use toast_store::ToastStore;
