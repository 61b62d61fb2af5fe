//! Run identity, artifact persistence and state for one pipeline run.

use crate::state::{RunState, StateKey, StateValue};
use bedtime_error::{BedtimeResult, StorageError, StorageErrorKind};
use bedtime_storage::{
    ArtifactKey, ArtifactReference, BlobStore, EphemeralStore, MediaType, content_hash,
};
use chrono::{DateTime, NaiveDate, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Artifact name under which the caller's photo is stored.
pub const USER_IMAGE_ARTIFACT: &str = "user_image";

/// URI scheme for an artifact held only by the ephemeral store.
pub const EPHEMERAL_URI_SCHEME: &str = "ephemeral://";

/// Identity of one pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Run {
    /// Fresh for every run
    run_id: Uuid,
    /// When the run started
    created_at: DateTime<Utc>,
}

impl Run {
    /// Starts a new run now.
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    /// UTC date used to partition artifact keys.
    pub fn date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

impl Default for Run {
    fn default() -> Self {
        Self::new()
    }
}

/// The caller's photo with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputImage {
    /// Image bytes
    pub data: Vec<u8>,
    /// MIME type, e.g. `image/png`
    pub mime: String,
}

impl InputImage {
    /// Wraps bytes, sniffing the MIME type from the file signature.
    ///
    /// Unknown signatures are treated as PNG.
    ///
    /// ```
    /// use bedtime_pipeline::InputImage;
    ///
    /// let jpeg = InputImage::new(vec![0xFF, 0xD8, 0xFF, 0xE0]);
    /// assert_eq!(jpeg.mime, "image/jpeg");
    /// ```
    pub fn new(data: Vec<u8>) -> Self {
        let mime = sniff_image_mime(&data).to_string();
        Self { data, mime }
    }

    /// Wraps bytes with an explicit MIME type.
    pub fn with_mime(data: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            data,
            mime: mime.into(),
        }
    }
}

fn artifact_reference(
    name: &str,
    key: &ArtifactKey,
    uri: String,
    content_hash: String,
    size_bytes: u64,
    mime: &str,
) -> ArtifactReference {
    ArtifactReference {
        name: name.to_string(),
        uri,
        key: key.to_string(),
        content_hash,
        size_bytes,
        media_type: MediaType::from_mime(mime),
        mime_type: mime.to_string(),
    }
}

fn sniff_image_mime(data: &[u8]) -> &'static str {
    match data {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/png",
    }
}

/// Everything one run owns: identity, state and its view of the stores.
///
/// Artifacts are written to the ephemeral store first and the durable store
/// second. The ephemeral copy stays readable even when the durable write
/// fails.
pub struct RunContext {
    run: Run,
    state: RunState,
    blob_store: Arc<dyn BlobStore>,
    ephemeral: Arc<dyn EphemeralStore>,
    artifacts: RwLock<HashMap<String, ArtifactKey>>,
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("run", &self.run)
            .field("state", &self.state)
            .field("blob_store", &self.blob_store.backend_name())
            .finish_non_exhaustive()
    }
}

impl RunContext {
    /// Creates a context for a fresh run with empty state.
    pub fn new(blob_store: Arc<dyn BlobStore>, ephemeral: Arc<dyn EphemeralStore>) -> Self {
        Self {
            run: Run::new(),
            state: RunState::new(),
            blob_store,
            ephemeral,
            artifacts: RwLock::new(HashMap::new()),
        }
    }

    /// Starts a run: records the prompt and, when given, stores the photo.
    ///
    /// A photo that cannot be stored durably is still recorded from its
    /// ephemeral copy, so steps of this run can read it.
    ///
    /// # Errors
    ///
    /// Only if the inputs of this context were already recorded.
    pub async fn start(
        input_text: &str,
        image: Option<InputImage>,
        blob_store: Arc<dyn BlobStore>,
        ephemeral: Arc<dyn EphemeralStore>,
    ) -> BedtimeResult<Self> {
        let mut ctx = Self::new(blob_store, ephemeral);
        ctx.record_inputs(input_text, image).await?;
        Ok(ctx)
    }

    /// Records the caller's inputs into this run.
    ///
    /// # Errors
    ///
    /// `StateConflict` if called twice on the same context.
    #[instrument(skip_all, fields(run_id = %self.run.run_id, has_image = image.is_some()))]
    pub async fn record_inputs(
        &mut self,
        input_text: &str,
        image: Option<InputImage>,
    ) -> BedtimeResult<()> {
        self.state
            .set(StateKey::InputText, StateValue::Text(input_text.to_string()))?;

        if let Some(image) = image {
            let hash = content_hash(&image.data);
            let size_bytes = image.data.len() as u64;
            let reference = match self
                .put_artifact(USER_IMAGE_ARTIFACT, image.data, &image.mime)
                .await
            {
                Ok(reference) => reference,
                Err(e) => {
                    // Reserved names have an ephemeral copy
                    let Some(key) = self.artifacts.read().await.get(USER_IMAGE_ARTIFACT).cloned()
                    else {
                        return Err(e);
                    };
                    warn!(key = %key, error = %e, "Photo kept in the ephemeral store only");
                    artifact_reference(
                        USER_IMAGE_ARTIFACT,
                        &key,
                        format!("{}{}", EPHEMERAL_URI_SCHEME, key),
                        hash,
                        size_bytes,
                        &image.mime,
                    )
                }
            };
            self.state
                .set(StateKey::UserImage, StateValue::Artifact(reference))?;
        }

        info!("Run started");
        Ok(())
    }

    /// This run's identity.
    pub fn run(&self) -> &Run {
        &self.run
    }

    /// Shorthand for `run().run_id()`.
    pub fn run_id(&self) -> Uuid {
        self.run.run_id
    }

    /// Read access to run state.
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Write access to run state.
    pub fn state_mut(&mut self) -> &mut RunState {
        &mut self.state
    }

    /// Stores an artifact under a run-scoped name.
    ///
    /// # Errors
    ///
    /// `InvalidKey` for a bad or reused name; any durable store error otherwise.
    #[instrument(skip(self, data), fields(run_id = %self.run.run_id, size = data.len()))]
    pub async fn put_artifact(
        &self,
        name: &str,
        data: Vec<u8>,
        mime: &str,
    ) -> BedtimeResult<ArtifactReference> {
        let key = ArtifactKey::new(self.run.date(), self.run.run_id, name, mime)?;

        {
            let mut artifacts = self.artifacts.write().await;
            if artifacts.contains_key(name) {
                return Err(StorageError::new(StorageErrorKind::InvalidKey(format!(
                    "artifact '{}' was already written in this run",
                    name
                )))
                .into());
            }
            artifacts.insert(name.to_string(), key.clone());
        }

        let hash = content_hash(&data);
        let size_bytes = data.len() as u64;

        self.ephemeral.put(&key, data.clone()).await;

        let uri = match self.blob_store.put(&key, &data, mime).await {
            Ok(uri) => uri,
            Err(e) => {
                warn!(key = %key, error = %e, "Durable write failed; ephemeral copy retained");
                return Err(e);
            }
        };
        debug!(key = %key, uri = %uri, "Artifact stored");

        Ok(artifact_reference(name, &key, uri, hash, size_bytes, mime))
    }

    /// Loads an artifact by name, preferring the ephemeral copy.
    ///
    /// # Errors
    ///
    /// `NotFound` if neither store has it.
    #[instrument(skip(self), fields(run_id = %self.run.run_id))]
    pub async fn get_artifact(&self, name: &str) -> BedtimeResult<Vec<u8>> {
        let key = self.artifacts.read().await.get(name).cloned();
        let Some(key) = key else {
            return Err(StorageError::new(StorageErrorKind::NotFound(format!(
                "artifact '{}' in run {}",
                name, self.run.run_id
            )))
            .into());
        };

        if let Some(data) = self.ephemeral.get(&key).await {
            debug!(key = %key, "Artifact served from ephemeral store");
            return Ok(data);
        }

        debug!(key = %key, "Artifact not cached, reading durable store");
        self.blob_store.get(&key).await
    }

    /// Drops this run's ephemeral copies and returns how many were removed.
    pub async fn evict_ephemeral(&self) -> usize {
        self.ephemeral.evict_run(self.run.run_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_common_signatures() {
        assert_eq!(sniff_image_mime(&[0x89, b'P', b'N', b'G', 0x0D]), "image/png");
        assert_eq!(sniff_image_mime(b"GIF89a"), "image/gif");
        assert_eq!(sniff_image_mime(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
        assert_eq!(sniff_image_mime(b"??"), "image/png");
    }

    #[test]
    fn run_date_matches_creation_day() {
        let run = Run::new();
        assert_eq!(run.date(), run.created_at().date_naive());
    }
}
