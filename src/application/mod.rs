//! Application layer with services and DTOs.

/// Data transfer objects.
pub mod dto;
/// Session, upload, toast and error-reporting services.
pub mod services;

pub use dto::{UploadState, UploadStatus, ValidationResult};
pub use services::{ErrorReporter, ImageUploader, SessionStore, ToastStore, UploadPolicy};
