//! Storage configuration and backend construction.

use crate::{BlobStore, FileSystemBlobStore, GcsBlobStore, InMemoryBlobStore};
use bedtime_error::{BedtimeResult, StorageError, StorageErrorKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Which durable backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Local directory tree
    #[default]
    #[display("filesystem")]
    Filesystem,
    /// Google Cloud Storage bucket
    #[display("gcs")]
    Gcs,
    /// Process memory (nothing survives the process)
    #[display("memory")]
    Memory,
}

/// `[storage]` section of the configuration file.
///
/// ```toml
/// [storage]
/// backend = "gcs"
/// bucket = "my-bedtime-stories"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Durable backend
    #[serde(default)]
    pub backend: StorageBackend,
    /// Root directory for the filesystem backend
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Bucket for the gcs backend
    #[serde(default)]
    pub bucket: Option<String>,
    /// JSON API endpoint override for the gcs backend
    #[serde(default)]
    pub gcs_base_url: Option<String>,
    /// Bearer token for the gcs backend; falls back to `GCS_ACCESS_TOKEN`
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,
}

fn default_root() -> PathBuf {
    PathBuf::from("bedtime-artifacts")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            root: default_root(),
            bucket: None,
            gcs_base_url: None,
            access_token: None,
        }
    }
}

impl StorageConfig {
    /// Construct the configured durable store.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when the gcs backend lacks a bucket or token,
    /// or a directory error when the filesystem root cannot be created.
    #[tracing::instrument(skip(self), fields(backend = %self.backend))]
    pub fn build_blob_store(&self) -> BedtimeResult<Arc<dyn BlobStore>> {
        match self.backend {
            StorageBackend::Filesystem => Ok(Arc::new(FileSystemBlobStore::new(&self.root)?)),
            StorageBackend::Memory => Ok(Arc::new(InMemoryBlobStore::new())),
            StorageBackend::Gcs => {
                let bucket = self.bucket.as_deref().ok_or_else(|| {
                    StorageError::new(StorageErrorKind::InvalidConfig(
                        "storage.bucket is required for the gcs backend".to_string(),
                    ))
                })?;
                let token = self
                    .access_token
                    .clone()
                    .or_else(|| std::env::var("GCS_ACCESS_TOKEN").ok())
                    .ok_or_else(|| {
                        StorageError::new(StorageErrorKind::InvalidConfig(
                            "set storage.access_token or GCS_ACCESS_TOKEN for the gcs backend"
                                .to_string(),
                        ))
                    })?;
                Ok(Arc::new(GcsBlobStore::new(
                    bucket,
                    token,
                    self.gcs_base_url.as_deref(),
                )?))
            }
        }
    }
}
