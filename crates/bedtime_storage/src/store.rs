//! Storage port definitions.

use crate::ArtifactKey;
use bedtime_error::BedtimeResult;
use uuid::Uuid;

/// Durable blob store shared across runs.
///
/// Keys are namespaced by run id, so concurrent runs never write the same
/// object.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes under `key` and return the durable URI.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the write does not complete.
    async fn put(&self, key: &ArtifactKey, data: &[u8], content_type: &str)
    -> BedtimeResult<String>;

    /// Read the bytes stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageErrorKind::NotFound` if nothing is stored under `key`.
    async fn get(&self, key: &ArtifactKey) -> BedtimeResult<Vec<u8>>;

    /// Check whether an object exists under `key`.
    async fn exists(&self, key: &ArtifactKey) -> BedtimeResult<bool>;

    /// Backend name for logs (e.g. "filesystem", "gcs").
    fn backend_name(&self) -> &'static str;
}

/// Ephemeral same-run artifact cache.
///
/// Writes here are independent of the durable outcome: a copy is kept even
/// when the durable write fails.
#[async_trait::async_trait]
pub trait EphemeralStore: Send + Sync {
    /// Cache bytes under `key`, replacing any previous entry.
    async fn put(&self, key: &ArtifactKey, data: Vec<u8>);

    /// Cached bytes under `key`, if any.
    async fn get(&self, key: &ArtifactKey) -> Option<Vec<u8>>;

    /// Drop every entry belonging to `run_id`, returning how many were removed.
    async fn evict_run(&self, run_id: Uuid) -> usize;
}
