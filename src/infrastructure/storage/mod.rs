//! Session storage adapters.

mod file_storage;
#[cfg(feature = "keyring")]
mod keyring_storage;
#[cfg(not(feature = "keyring"))]
mod keyring_storage_stub;
mod memory_storage;

pub use file_storage::{FileStorage, SESSION_FILE_NAME};
#[cfg(feature = "keyring")]
pub use keyring_storage::KeyringStorage;
#[cfg(not(feature = "keyring"))]
pub use keyring_storage_stub::KeyringStorage;
pub use memory_storage::MemoryStorage;
