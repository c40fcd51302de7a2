//! Data transfer objects for the application layer.

mod upload_dto;

pub use upload_dto::{UploadState, UploadStatus, ValidationResult};
