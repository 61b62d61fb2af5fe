//! Filesystem-based blob store.
//!
//! Objects are laid out exactly like their keys, so a run's artifacts end up
//! in one directory per run:
//!
//! ```text
//! ./bedtime-artifacts/
//! └── 2024-05-01/
//!     └── 6f1c.../
//!         ├── user_image.png
//!         ├── scene_0.png
//!         ├── scene_1.png
//!         └── story_audio.wav
//! ```

use crate::{ArtifactKey, BlobStore};
use bedtime_error::{BedtimeResult, StorageError, StorageErrorKind};
use std::path::PathBuf;

/// Filesystem blob store.
///
/// Writes go to a temp file first and are renamed into place, so readers
/// never observe a partially written artifact.
#[derive(Debug, Clone)]
pub struct FileSystemBlobStore {
    base_path: PathBuf,
}

impl FileSystemBlobStore {
    /// Create a new filesystem store rooted at `base_path`.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or accessed.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> BedtimeResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        // Canonicalize so returned URIs are absolute
        let base_path = base_path.canonicalize().unwrap_or(base_path);

        tracing::info!(path = %base_path.display(), "Created filesystem blob store");
        Ok(Self { base_path })
    }

    /// Root directory of the store.
    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }

    /// Filesystem path for a key.
    fn path_for(&self, key: &ArtifactKey) -> PathBuf {
        self.base_path.join(key.to_string())
    }
}

#[async_trait::async_trait]
impl BlobStore for FileSystemBlobStore {
    #[tracing::instrument(skip(self, data), fields(key = %key, size = data.len()))]
    async fn put(
        &self,
        key: &ArtifactKey,
        data: &[u8],
        content_type: &str,
    ) -> BedtimeResult<String> {
        let path = self.path_for(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::Write(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::Write(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::info!(
            path = %path.display(),
            size = data.len(),
            content_type,
            "Stored artifact"
        );

        Ok(format!("file://{}", path.display()))
    }

    #[tracing::instrument(skip(self), fields(key = %key))]
    async fn get(&self, key: &ArtifactKey) -> BedtimeResult<Vec<u8>> {
        let path = self.path_for(key);

        let data = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(key.to_string()))
            } else {
                StorageError::new(StorageErrorKind::Read(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        tracing::debug!(path = %path.display(), size = data.len(), "Read artifact");
        Ok(data)
    }

    async fn exists(&self, key: &ArtifactKey) -> BedtimeResult<bool> {
        Ok(tokio::fs::try_exists(self.path_for(key))
            .await
            .unwrap_or(false))
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
