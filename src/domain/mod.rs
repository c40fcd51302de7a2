//! Domain layer with core entities, services and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Serde utilities.
pub mod serde_utils;
/// Domain services.
pub mod services;
/// Toast notifications.
pub mod toast;

pub use entities::{AuthToken, Session, SessionUser, TokenPair};
pub use errors::{ApiError, StorageError};
pub use ports::{AuthPort, NavigatorPort, StorageKey, StoragePort, UploadPort};
pub use services::SessionContext;
pub use toast::{Toast, ToastId, ToastKind};
