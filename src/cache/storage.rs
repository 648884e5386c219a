//! Pluggable string key-value backends for persisted cache snapshots

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

use crate::error::AppError;

/// Opaque async string store a cache snapshot is persisted through.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Returns the stored string, or `None` when nothing is stored under `name`
    async fn get_item(&self, name: &str) -> Result<Option<String>, AppError>;

    async fn set_item(&self, name: &str, value: String) -> Result<(), AppError>;

    /// Removing a missing item is not an error
    async fn remove_item(&self, name: &str) -> Result<(), AppError>;
}

/// In-process storage, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with one item
    pub fn with_item(name: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.lock().insert(name.into(), value.into());
        storage
    }

    /// Synchronous peek used by diagnostics and tests
    pub fn snapshot(&self, name: &str) -> Option<String> {
        self.lock().get(name).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    async fn get_item(&self, name: &str) -> Result<Option<String>, AppError> {
        Ok(self.lock().get(name).cloned())
    }

    async fn set_item(&self, name: &str, value: String) -> Result<(), AppError> {
        self.lock().insert(name.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, name: &str) -> Result<(), AppError> {
        self.lock().remove(name);
        Ok(())
    }
}

/// One `<name>.json` file per item inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `name`.
    ///
    /// Names are reduced to `[A-Za-z0-9_-]` so an item name can never
    /// escape the storage directory.
    pub fn item_path(&self, name: &str) -> PathBuf {
        let file_name: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

#[async_trait]
impl StorageAdapter for FileStorage {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn get_item(&self, name: &str) -> Result<Option<String>, AppError> {
        let path = self.item_path(name);
        match fs::read_to_string(&path).await {
            Ok(content) => {
                debug!("Read {} bytes from {}", content.len(), path.display());
                Ok(Some(content))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::storage_error(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    #[instrument(skip(self, value), fields(dir = %self.dir.display(), bytes = value.len()))]
    async fn set_item(&self, name: &str, value: String) -> Result<(), AppError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).await?;
        }

        // Write to a sibling temp file first so readers never see a torn blob.
        let path = self.item_path(name);
        let tmp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(value.as_bytes()).await?;
        file.flush().await?;
        drop(file);
        fs::rename(&tmp_path, &path).await?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn remove_item(&self, name: &str) -> Result<(), AppError> {
        match fs::remove_file(self.item_path(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}
