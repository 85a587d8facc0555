//! File-based key-value storage
//!
//! Stores each key as its own file (`<dir>/<key>.json`) on disk.
//!
//! Writes go to a temp file first and are swapped in by rename. While the
//! swap is in flight the previous value sits at `<dir>/.<key>.json.bak`, and
//! reads fall back to it if the key file is missing.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use super::key_value::KeyValueStore;
use crate::{Error, Result};

/// File-per-key store rooted at a data directory
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Create a new FileKeyValueStore
    ///
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the key files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(Error::InvalidInput(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn backup_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}.json.bak", key))
    }
}

async fn read_optional(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Storage(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        if let Some(content) = read_optional(&path).await? {
            return Ok(Some(content));
        }

        let backup_path = self.backup_path(key);
        let backup = read_optional(&backup_path).await?;
        if backup.is_some() {
            warn!(key, "Key file missing, reading {}", backup_path.display());
        }
        Ok(backup)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::Storage(format!("Failed to create directory: {}", e))
        })?;

        let temp_path = self
            .dir
            .join(format!(".{}.{}.tmp", key, Uuid::new_v4().as_hyphenated()));
        tokio::fs::write(&temp_path, value).await.map_err(|e| {
            Error::Storage(format!("Failed to write {}: {}", temp_path.display(), e))
        })?;

        let backup_path = self.backup_path(key);
        let mut had_original = false;
        if tokio::fs::metadata(&path).await.is_ok() {
            had_original = true;
            if let Err(err) = tokio::fs::rename(&path, &backup_path).await {
                let _ = tokio::fs::remove_file(&temp_path).await;
                return Err(Error::Storage(format!(
                    "Failed to prepare atomic write of {}: {}",
                    path.display(),
                    err
                )));
            }
        }

        if let Err(err) = tokio::fs::rename(&temp_path, &path).await {
            if had_original {
                let _ = tokio::fs::rename(&backup_path, &path).await;
            }
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(Error::Storage(format!(
                "Failed to finalize atomic write of {}: {}",
                path.display(),
                err
            )));
        }

        // Also clears a backup left by an earlier interrupted swap
        let _ = tokio::fs::remove_file(&backup_path).await;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}
