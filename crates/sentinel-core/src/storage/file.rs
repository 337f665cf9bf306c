//! JSON file storage backend
//!
//! Keeps every entry in a single `vault.json` file in the data directory.
//! Values are the serialized records, whose password fields are already
//! encrypted by the vault layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

use super::RecordStorage;
use crate::error::{Result, SentinelError};

/// Current on-disk file version
const FILE_VERSION: u32 = 1;

/// File format for persistent storage
#[derive(Debug, Default, Serialize, Deserialize)]
struct StorageFile {
    version: u32,
    entries: BTreeMap<String, String>,
}

/// JSON file storage backend
pub struct FileStorage {
    /// Directory for storage files
    storage_dir: PathBuf,
    /// In-memory copy of the file contents
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open the storage in `storage_dir`, creating the directory if needed
    /// and loading any existing entries
    pub async fn open(storage_dir: impl Into<PathBuf>) -> Result<Self> {
        let storage_dir = storage_dir.into();
        tokio::fs::create_dir_all(&storage_dir).await?;

        let entries = Self::load(&storage_dir.join("vault.json")).await?;
        debug!(
            "File storage opened at {:?} with {} entries",
            storage_dir,
            entries.len()
        );

        Ok(Self {
            storage_dir,
            entries: RwLock::new(entries),
        })
    }

    /// Get the path to the storage file
    fn storage_file_path(&self) -> PathBuf {
        self.storage_dir.join("vault.json")
    }

    /// Get the storage directory path
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    async fn load(path: &Path) -> Result<BTreeMap<String, String>> {
        if !tokio::fs::try_exists(path).await? {
            debug!("No existing storage file found");
            return Ok(BTreeMap::new());
        }

        let contents = tokio::fs::read_to_string(path).await?;
        let file: StorageFile = serde_json::from_str(&contents)?;

        if file.version != FILE_VERSION {
            return Err(SentinelError::StorageError(format!(
                "Unsupported storage file version: {}",
                file.version
            )));
        }

        Ok(file.entries)
    }

    /// Write the entries to disk atomically using a temp file
    async fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let file = StorageFile {
            version: FILE_VERSION,
            entries: entries.clone(),
        };

        let contents = serde_json::to_string_pretty(&file)?;
        let path = self.storage_file_path();

        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        debug!("Saved {} entries to storage", entries.len());
        Ok(())
    }
}

#[async_trait]
impl RecordStorage for FileStorage {
    async fn store(&self, key: &str, value: &[u8]) -> Result<()> {
        let value = std::str::from_utf8(value)
            .map_err(|e| SentinelError::StorageError(format!("Value is not UTF-8: {}", e)))?;

        let mut entries = self.entries.write().await;
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value.to_string());

        // Only publish the change once it is on disk
        self.save(&updated).await?;
        *entries = updated;

        debug!("Stored key: {}", key);
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).map(|v| v.clone().into_bytes()))
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;

        let mut updated = entries.clone();
        if updated.remove(key).is_none() {
            return Ok(false);
        }

        self.save(&updated).await?;
        *entries = updated;
        debug!("Deleted key: {}", key);
        Ok(true)
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let entries = self.entries.read().await;

        Ok(entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "JSON File Storage"
    }
}
