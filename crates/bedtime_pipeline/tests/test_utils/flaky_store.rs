//! Blob store that rejects writes for chosen artifact names.

use async_trait::async_trait;
use bedtime_error::{BedtimeResult, StorageError, StorageErrorKind};
use bedtime_storage::{ArtifactKey, BlobStore, InMemoryBlobStore};

/// In-memory store whose `put` fails for listed names.
#[derive(Debug, Default)]
pub struct FlakyBlobStore {
    inner: InMemoryBlobStore,
    failing: Vec<String>,
    fail_all: bool,
}

impl FlakyBlobStore {
    /// Fails writes of the named artifacts only.
    pub fn failing_on(names: &[&str]) -> Self {
        Self {
            inner: InMemoryBlobStore::new(),
            failing: names.iter().map(|n| n.to_string()).collect(),
            fail_all: false,
        }
    }

    /// Fails every write.
    pub fn always_failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    /// The underlying store.
    pub fn inner(&self) -> &InMemoryBlobStore {
        &self.inner
    }
}

#[async_trait]
impl BlobStore for FlakyBlobStore {
    async fn put(&self, key: &ArtifactKey, data: &[u8], content_type: &str) -> BedtimeResult<String> {
        if self.fail_all || self.failing.iter().any(|n| n == key.name()) {
            return Err(StorageError::new(StorageErrorKind::Unavailable(format!(
                "refusing to write {key}"
            )))
            .into());
        }
        self.inner.put(key, data, content_type).await
    }

    async fn get(&self, key: &ArtifactKey) -> BedtimeResult<Vec<u8>> {
        self.inner.get(key).await
    }

    async fn exists(&self, key: &ArtifactKey) -> BedtimeResult<bool> {
        self.inner.exists(key).await
    }

    fn backend_name(&self) -> &'static str {
        "flaky"
    }
}
