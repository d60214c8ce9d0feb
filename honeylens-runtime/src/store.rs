//! Sensitivity configuration binding
//!
//! The engine only reads the stored sensitivity. Seeding the default value
//! is an installer concern and lives on the file store.

use async_trait::async_trait;
use honeylens_core::DEFAULT_SENSITIVITY;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Key of the sensitivity value in the configuration file
pub const SENSITIVITY_KEY: &str = "sensitivity";

/// Configuration faults
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Source of the user's sensitivity setting
#[async_trait]
pub trait SensitivityStore: Send + Sync {
    /// Raw stored value, `None` when unset
    async fn load(&self) -> Result<Option<String>, ConfigError>;
}

/// Interpret a raw stored value. Unset, empty and non-numeric values fall
/// back to the default threshold.
pub fn parse_sensitivity(raw: Option<&str>) -> f64 {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        debug!("Sensitivity unset, using default {}", DEFAULT_SENSITIVITY);
        return DEFAULT_SENSITIVITY;
    };

    match value.parse::<f64>() {
        Ok(sensitivity) if sensitivity.is_finite() => sensitivity,
        _ => {
            warn!(
                "Ignoring non-numeric sensitivity {:?}, using default {}",
                value, DEFAULT_SENSITIVITY
            );
            DEFAULT_SENSITIVITY
        }
    }
}

/// Sensitivity stored under the top-level `sensitivity` key of a TOML file
#[derive(Debug, Clone)]
pub struct TomlFileStore {
    path: PathBuf,
}

impl TomlFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    async fn read_table(&self) -> Result<Option<toml::Table>, ConfigError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.display_path(),
                    source,
                })
            }
        };

        let table = toml::from_str::<toml::Table>(&content).map_err(|source| ConfigError::Parse {
            path: self.display_path(),
            source,
        })?;

        Ok(Some(table))
    }

    /// Store the default sensitivity when none is set, keeping other keys.
    /// Returns whether the file was written.
    pub async fn initialize_default(&self) -> Result<bool, ConfigError> {
        let mut table = self.read_table().await?.unwrap_or_default();
        if stored_value(&table).is_some() {
            debug!("Sensitivity already set in {}", self.display_path());
            return Ok(false);
        }

        table.insert(
            SENSITIVITY_KEY.to_string(),
            toml::Value::String(DEFAULT_SENSITIVITY.to_string()),
        );

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ConfigError::Write {
                    path: parent.display().to_string(),
                    source,
                })?;
        }

        let content = toml::to_string(&table)?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|source| ConfigError::Write {
                path: self.display_path(),
                source,
            })?;

        info!(
            "Seeded sensitivity {} in {}",
            DEFAULT_SENSITIVITY,
            self.display_path()
        );
        Ok(true)
    }
}

/// Raw value of the sensitivity key; numbers are accepted as well as strings
fn stored_value(table: &toml::Table) -> Option<String> {
    match table.get(SENSITIVITY_KEY)? {
        toml::Value::String(s) if s.is_empty() => None,
        toml::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl SensitivityStore for TomlFileStore {
    async fn load(&self) -> Result<Option<String>, ConfigError> {
        Ok(self.read_table().await?.as_ref().and_then(stored_value))
    }
}

/// In-process store, useful for sessions and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new(value: Option<String>) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    pub async fn set(&self, value: Option<String>) {
        *self.value.write().await = value;
    }
}

#[async_trait]
impl SensitivityStore for MemoryStore {
    async fn load(&self) -> Result<Option<String>, ConfigError> {
        Ok(self.value.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("honeylens-store-{}-{}", std::process::id(), name))
            .join("honeylens.toml")
    }

    #[test]
    fn test_parse_sensitivity() {
        assert_eq!(parse_sensitivity(Some("10")), 10.0);
        assert_eq!(parse_sensitivity(Some(" 72.5 ")), 72.5);
        assert_eq!(parse_sensitivity(None), 65.0);
        assert_eq!(parse_sensitivity(Some("")), 65.0);
        assert_eq!(parse_sensitivity(Some("very")), 65.0);
        assert_eq!(parse_sensitivity(Some("NaN")), 65.0);
    }

    #[tokio::test]
    async fn test_missing_file_is_unset() {
        let store = TomlFileStore::new(temp_path("missing"));
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_accepts_string_and_number() {
        let path = temp_path("forms");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let store = TomlFileStore::new(&path);

        std::fs::write(&path, "sensitivity = \"40\"\n").unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some("40"));

        std::fs::write(&path, "sensitivity = 55\n").unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some("55"));

        std::fs::write(&path, "[throttle]\ncooldown_ms = 100\n").unwrap();
        assert_eq!(store.load().await.unwrap(), None);

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[tokio::test]
    async fn test_parse_error_is_reported() {
        let path = temp_path("broken");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "sensitivity = = 3").unwrap();

        let err = TomlFileStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[tokio::test]
    async fn test_initialize_default_seeds_once() {
        let path = temp_path("seed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[notify]\nwebhook_url = \"http://127.0.0.1:9/badge\"\n").unwrap();
        let store = TomlFileStore::new(&path);

        assert!(store.initialize_default().await.unwrap());
        assert_eq!(store.load().await.unwrap().as_deref(), Some("65"));
        assert!(!store.initialize_default().await.unwrap());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("webhook_url"));

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::default();
        assert_eq!(store.load().await.unwrap(), None);
        store.set(Some("20".to_string())).await;
        assert_eq!(store.load().await.unwrap().as_deref(), Some("20"));
    }
}
