//! In-memory storage backends.

use crate::{ArtifactKey, BlobStore, EphemeralStore};
use bedtime_error::{BedtimeResult, StorageError, StorageErrorKind};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Durable-store stand-in that keeps objects in process memory.
///
/// Useful for tests and dry runs; URIs have the form `memory://{key}`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlobStore {
    objects: Arc<RwLock<HashMap<String, (String, Vec<u8>)>>>,
}

impl InMemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored key, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Content type recorded for `key`.
    pub async fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .read()
            .await
            .get(key)
            .map(|(content_type, _)| content_type.clone())
    }
}

#[async_trait::async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(
        &self,
        key: &ArtifactKey,
        data: &[u8],
        content_type: &str,
    ) -> BedtimeResult<String> {
        let key = key.to_string();
        self.objects
            .write()
            .await
            .insert(key.clone(), (content_type.to_string(), data.to_vec()));
        tracing::debug!(key = %key, size = data.len(), "Stored object in memory");
        Ok(format!("memory://{}", key))
    }

    async fn get(&self, key: &ArtifactKey) -> BedtimeResult<Vec<u8>> {
        let key = key.to_string();
        self.objects
            .read()
            .await
            .get(&key)
            .map(|(_, data)| data.clone())
            .ok_or_else(|| StorageError::new(StorageErrorKind::NotFound(key)).into())
    }

    async fn exists(&self, key: &ArtifactKey) -> BedtimeResult<bool> {
        Ok(self.objects.read().await.contains_key(&key.to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Process-local cache used as the ephemeral artifact store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEphemeralStore {
    entries: Arc<RwLock<HashMap<ArtifactKey, Vec<u8>>>>,
}

impl InMemoryEphemeralStore {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached artifacts across all runs.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds nothing.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl EphemeralStore for InMemoryEphemeralStore {
    async fn put(&self, key: &ArtifactKey, data: Vec<u8>) {
        self.entries.write().await.insert(key.clone(), data);
    }

    async fn get(&self, key: &ArtifactKey) -> Option<Vec<u8>> {
        self.entries.read().await.get(key).cloned()
    }

    async fn evict_run(&self, run_id: Uuid) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| key.run_id() != run_id);
        let removed = before - entries.len();
        tracing::debug!(run_id = %run_id, removed, "Evicted ephemeral artifacts");
        removed
    }
}
