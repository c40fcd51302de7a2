//! Config file loading and saving.

use super::app_config::AppConfig;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";
const CONFIG_HEADER: &str = "# portfolio-admin configuration\n\
# PORTFOLIO_API_URL and command-line flags override the values below.\n\n";

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No platform config directory.
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    /// Reading or writing a file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration could not be serialized.
    #[error("failed to encode configuration: {0}")]
    Encode(#[from] toml::ser::Error),
}

impl ConfigError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Reads and writes `config.toml`.
///
/// A missing file is created with defaults. A file that does not parse is
/// left untouched and defaults are used for the run.
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// # Errors
    ///
    /// Returns `ConfigError` if the platform config directory cannot be determined.
    pub fn new() -> Result<Self, ConfigError> {
        AppConfig::default_config_dir()
            .map(Self::with_dir)
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Manager rooted at `path`.
    #[must_use]
    pub fn with_dir(path: PathBuf) -> Self {
        Self { config_dir: path }
    }

    /// Directory holding the default config file.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Config file used for `path_override`, or the default one.
    #[must_use]
    pub fn config_path(&self, path_override: Option<&Path>) -> PathBuf {
        path_override.map_or_else(|| self.config_dir.join(CONFIG_FILE_NAME), Path::to_path_buf)
    }

    /// # Errors
    ///
    /// Returns `ConfigError` if a missing file cannot be created or an
    /// existing one cannot be read.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let path = self.config_path(path_override);

        if !path.exists() {
            info!(path = %path.display(), "Config file not found, writing defaults");
            let config = AppConfig::default();
            write_atomic(&path, &config)?;
            return Ok(config);
        }

        let content = fs::read_to_string(&path).map_err(ConfigError::io(&path))?;
        match toml::from_str::<AppConfig>(&content) {
            Ok(config) => {
                debug!(path = %path.display(), "Config loaded");
                Ok(config)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Config file is malformed, using defaults");
                Ok(AppConfig::default())
            }
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be written.
    pub fn save_config(
        &self,
        config: &AppConfig,
        path_override: Option<&Path>,
    ) -> Result<(), ConfigError> {
        write_atomic(&self.config_path(path_override), config)
    }
}

fn write_atomic(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    let body = toml::to_string_pretty(config)?;
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(ConfigError::io(parent))?;

    let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(ConfigError::io(parent))?;
    temp.write_all(CONFIG_HEADER.as_bytes())
        .and_then(|()| temp.write_all(body.as_bytes()))
        .map_err(ConfigError::io(path))?;
    temp.persist(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::StorageBackend;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().join("portfolio-admin"));

        let config = manager.load_config(None).unwrap();
        assert_eq!(config.api.timeout_secs, 30);

        let content = fs::read_to_string(manager.config_path(None)).unwrap();
        assert!(content.starts_with("# portfolio-admin configuration"));
        assert!(content.contains("[upload]"));
    }

    #[test]
    fn test_malformed_file_is_left_alone() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());
        let path = manager.config_path(None);
        fs::write(&path, "[api\nbase_url = ").unwrap();

        let config = manager.load_config(None).unwrap();

        assert_eq!(config.api.base_url, AppConfig::default().api.base_url);
        assert_eq!(fs::read_to_string(&path).unwrap(), "[api\nbase_url = ");
    }

    #[test]
    fn test_saved_config_loads_back() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());

        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Keyring;
        config.api.base_url = "https://api.example.com/api".into();
        manager.save_config(&config, None).unwrap();

        let loaded = manager.load_config(None).unwrap();
        assert_eq!(loaded.storage.backend, StorageBackend::Keyring);
        assert_eq!(loaded.api.base_url, "https://api.example.com/api");
    }

    #[test]
    fn test_override_skips_default_directory() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().join("unused"));
        let custom = dir.path().join("custom").join("admin.toml");

        manager.load_config(Some(&custom)).unwrap();

        assert!(custom.exists());
        assert!(!manager.config_dir().exists());
    }
}
