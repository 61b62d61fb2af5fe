//! Bedtime: turn a photo and a prompt into an illustrated, narrated bedtime story.
//!
//! This crate re-exports the workspace crates and adds layered configuration
//! ([`BedtimeConfig`]) plus [`build_pipeline`], which wires the configured
//! Gemini client and blob store into a [`StoryPipeline`].
//!
//! # Example
//!
//! ```no_run
//! use bedtime::{BedtimeConfig, InputImage, build_pipeline};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BedtimeConfig::load(None)?;
//! let pipeline = build_pipeline(&config)?;
//!
//! let photo = std::fs::read("kid.png")?;
//! let outcome = pipeline.run("a trip to the moon", Some(InputImage::new(photo))).await;
//! println!("{}", serde_json::to_string_pretty(&outcome)?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;

pub use config::BedtimeConfig;

pub use bedtime_core::{
    AudioEncoding, GenerateRequest, GenerateResponse, Input, LogFormat, LoggingConfig, Modality,
    Output, ResponseFormat, VoiceConfig, init_telemetry, shutdown_telemetry,
};
pub use bedtime_error::{
    BedtimeError, BedtimeErrorKind, BedtimeResult, ConfigError, ConfigErrorKind, FailureKind,
    GenerationError, GenerationErrorKind, StepError, StepErrorKind, StorageError, StorageErrorKind,
};
pub use bedtime_interface::GenerationDriver;
pub use bedtime_models::{GeminiClient, GeminiConfig};
pub use bedtime_pipeline::{
    FailureReport, IllustratedScene, InputImage, PipelineConfig, PipelineOutcome, RunContext,
    RunState, RunStatus, StateKey, StateValue, Step, StepName, StoryOutputs, StoryPipeline,
};
pub use bedtime_storage::{
    ArtifactReference, BlobStore, EphemeralStore, FileSystemBlobStore, GcsBlobStore,
    InMemoryBlobStore, InMemoryEphemeralStore, StorageBackend, StorageConfig,
};

use std::sync::Arc;

/// Build a pipeline from configuration: a Gemini client over the configured
/// blob store.
///
/// # Errors
///
/// Returns an error if the Gemini API key is missing or the blob store
/// cannot be constructed.
#[tracing::instrument(skip_all, fields(backend = %config.storage.backend))]
pub fn build_pipeline(config: &BedtimeConfig) -> BedtimeResult<StoryPipeline> {
    let driver: Arc<dyn GenerationDriver> = Arc::new(GeminiClient::new(&config.gemini)?);
    let blob_store = config.storage.build_blob_store()?;
    Ok(StoryPipeline::new(driver, blob_store, &config.pipeline))
}
