use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::backend::{Collection, CollectionStore};
use crate::error::{PilotError, Result};

/// JSON files under a data directory, one per collection.
///
/// Saves go through `<file>.tmp` and a rename so a crash never leaves a
/// half-written collection behind. There is no cross-process locking.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.dir.join(collection.file_name())
    }

    fn tmp_path_for(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.tmp", collection.file_name()))
    }

    fn retired_path_for(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.migrated", collection.file_name()))
    }
}

impl CollectionStore for FileStore {
    async fn ensure(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            PilotError::Storage(format!(
                "failed to create data directory {}: {e}",
                self.dir.display()
            ))
        })?;

        for collection in Collection::SEEDED {
            let path = self.path_for(collection);
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                tokio::fs::write(&path, "[]").await.map_err(|e| {
                    PilotError::Storage(format!("failed to seed {}: {e}", path.display()))
                })?;
                tracing::debug!("seeded empty collection {}", path.display());
            }
        }
        Ok(())
    }

    async fn load<T: DeserializeOwned + Send>(&self, collection: Collection) -> Result<Vec<T>> {
        let path = self.path_for(collection);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                tracing::error!("failed reading {}: {e}", path.display());
                return Ok(Vec::new());
            }
        };

        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::error!("failed parsing {}: {e}", path.display());
                Ok(Vec::new())
            }
        }
    }

    async fn save<T: Serialize + Sync>(&self, collection: Collection, items: &[T]) -> Result<()> {
        let body = serde_json::to_string_pretty(items)?;
        let tmp = self.tmp_path_for(collection);
        let path = self.path_for(collection);

        tokio::fs::write(&tmp, body).await.map_err(|e| {
            PilotError::Storage(format!("failed to write {}: {e}", tmp.display()))
        })?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| {
            PilotError::Storage(format!("failed to replace {}: {e}", path.display()))
        })?;
        Ok(())
    }

    async fn contains(&self, collection: Collection) -> bool {
        tokio::fs::try_exists(self.path_for(collection))
            .await
            .unwrap_or(false)
    }

    async fn retire(&self, collection: Collection) -> Result<bool> {
        let path = self.path_for(collection);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(false);
        }
        let retired = self.retired_path_for(collection);
        tokio::fs::rename(&path, &retired).await.map_err(|e| {
            PilotError::Storage(format!(
                "failed to rename {} to {}: {e}",
                path.display(),
                retired.display()
            ))
        })?;
        Ok(true)
    }
}
