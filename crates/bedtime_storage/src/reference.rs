//! Artifact reference types.

use crate::MediaType;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Reference to a persisted artifact.
///
/// The `uri` points at the durable copy, which is the source of truth; the
/// ephemeral copy is only a same-run cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactReference {
    /// Logical artifact name (e.g. `scene_0`)
    pub name: String,
    /// Durable location (e.g. `gs://bucket/2024-05-01/<run>/scene_0.png`)
    pub uri: String,
    /// Store key the artifact was written under
    pub key: String,
    /// SHA-256 of the content, hex encoded
    pub content_hash: String,
    /// Size of the content in bytes
    pub size_bytes: u64,
    /// Coarse media classification
    pub media_type: MediaType,
    /// MIME type
    pub mime_type: String,
}

/// Compute the hex SHA-256 of some bytes.
///
/// ```
/// use bedtime_storage::content_hash;
///
/// assert_eq!(
///     content_hash(b"abc"),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
