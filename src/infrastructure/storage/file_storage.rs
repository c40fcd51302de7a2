//! JSON file storage.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::errors::StorageError;
use crate::domain::ports::{StorageKey, StoragePort};

/// File name used inside the data directory.
pub const SESSION_FILE_NAME: &str = "session.json";

type Entries = BTreeMap<String, String>;

/// Keeps every key in one JSON object on disk.
///
/// The file is loaded on first access and rewritten atomically after every
/// change. Temporary files are created owner-only, so the persisted file is
/// never readable by other users.
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<Option<Entries>>,
}

impl FileStorage {
    /// Storage backed by the JSON file at `path`, read lazily.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(None),
        }
    }

    /// Creates storage at [`SESSION_FILE_NAME`] inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SESSION_FILE_NAME))
    }

    /// Session file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Entries, StorageError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(StorageError::ReadFailed(e.to_string())),
        };

        match serde_json::from_str::<Entries>(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Session file is corrupt, starting empty");
                Ok(Entries::new())
            }
        }
    }

    fn write(path: &Path, entries: &Entries) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

        let parent = path
            .parent()
            .ok_or_else(|| StorageError::AccessFailed(format!("invalid path {}", path.display())))?;
        std::fs::create_dir_all(parent).map_err(|e| StorageError::AccessFailed(e.to_string()))?;

        let mut temp_file = tempfile::NamedTempFile::new_in(parent)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        temp_file
            .persist(path)
            .map_err(|e| StorageError::WriteFailed(e.error.to_string()))?;

        Ok(())
    }

    async fn update<F>(&self, change: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut Entries) -> bool,
    {
        let mut guard = self.entries.lock().await;
        let mut entries = match guard.take() {
            Some(entries) => entries,
            None => self.load().await?,
        };

        let changed = change(&mut entries);
        let result = if changed {
            Self::write(&self.path, &entries)
        } else {
            Ok(())
        };

        // Keep memory in step with disk: reload on the next access after a failed write.
        if result.is_ok() {
            *guard = Some(entries);
        }
        result
    }
}

#[async_trait]
impl StoragePort for FileStorage {
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            debug!(path = ?self.path, "Loading session file");
            *guard = Some(self.load().await?);
        }
        Ok(guard
            .as_ref()
            .and_then(|entries| entries.get(key.as_str()).cloned()))
    }

    async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.as_str().to_string(), value.to_string());
            true
        })
        .await
    }

    async fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        self.update(|entries| entries.remove(key.as_str()).is_some())
            .await
    }
}
