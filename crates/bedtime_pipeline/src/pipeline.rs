//! The story pipeline orchestrator.

use crate::config::PipelineConfig;
use crate::context::{InputImage, RunContext};
use crate::state::IllustratedScene;
use crate::step::{Step, StepName, classify_error};
use crate::steps::{AudiobookGenerator, CharacterDescriber, SceneIllustrator, StoryWriter};
use bedtime_error::{FailureKind, StepError, StepErrorKind};
use bedtime_interface::GenerationDriver;
use bedtime_storage::{BlobStore, EphemeralStore, InMemoryEphemeralStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// Lifecycle of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunStatus {
    /// No step has started
    NotStarted,
    /// A step is in progress
    Running {
        /// The active step
        step: StepName,
    },
    /// Every step finished
    Succeeded,
    /// A step failed; later steps never ran
    Failed {
        /// The failing step
        step: StepName,
        /// Why it failed
        kind: FailureKind,
    },
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::NotStarted => write!(f, "not_started"),
            RunStatus::Running { step } => write!(f, "running({})", step),
            RunStatus::Succeeded => write!(f, "succeeded"),
            RunStatus::Failed { step, kind } => write!(f, "failed({}, {})", step, kind),
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryOutputs {
    /// Cartoon description of the main character
    pub character_description: String,
    /// The whole story
    pub full_narrative: String,
    /// Scenes with their illustrations, in story order
    pub illustrated_scenes: Vec<IllustratedScene>,
    /// Durable location of the narration
    pub audiobook_uri: String,
}

/// Why a run failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    /// The failing step
    pub step: StepName,
    /// Error category
    pub kind: FailureKind,
    /// Human-readable detail
    pub message: String,
}

/// Result of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOutcome {
    /// The run's identifier
    pub run_id: Uuid,
    /// Final status
    pub status: RunStatus,
    /// Present on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<StoryOutputs>,
    /// Present on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FailureReport>,
}

impl PipelineOutcome {
    /// Whether every step succeeded.
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Succeeded
    }

    fn failed(run_id: Uuid, step: StepName, err: &StepError) -> Self {
        let kind = err.failure_kind();
        Self {
            run_id,
            status: RunStatus::Failed { step, kind },
            outputs: None,
            error: Some(FailureReport {
                step,
                kind,
                message: err.kind.detail(),
            }),
        }
    }
}

/// Runs the four story steps in order over one run.
///
/// # Examples
///
/// ```rust,ignore
/// use bedtime_pipeline::{InputImage, PipelineConfig, StoryPipeline};
/// use bedtime_storage::InMemoryBlobStore;
/// use std::sync::Arc;
///
/// let pipeline = StoryPipeline::new(driver, Arc::new(InMemoryBlobStore::new()), &PipelineConfig::default());
/// let outcome = pipeline.run("a trip to the moon", Some(InputImage::new(photo))).await;
/// println!("{}", serde_json::to_string_pretty(&outcome)?);
/// ```
pub struct StoryPipeline {
    steps: Vec<Box<dyn Step>>,
    blob_store: Arc<dyn BlobStore>,
    ephemeral: Arc<dyn EphemeralStore>,
}

impl StoryPipeline {
    /// Creates the standard pipeline: character, story, illustrations, narration.
    pub fn new(
        driver: Arc<dyn GenerationDriver>,
        blob_store: Arc<dyn BlobStore>,
        config: &PipelineConfig,
    ) -> Self {
        let steps: Vec<Box<dyn Step>> = vec![
            Box::new(CharacterDescriber::new(
                Arc::clone(&driver),
                &config.vision_model,
            )),
            Box::new(StoryWriter::new(
                Arc::clone(&driver),
                &config.text_model,
                &config.default_theme,
            )),
            Box::new(SceneIllustrator::new(
                Arc::clone(&driver),
                &config.image_model,
                &config.art_style,
                config.max_concurrent_illustrations,
            )),
            Box::new(AudiobookGenerator::new(
                driver,
                &config.speech_model,
                config.voice.clone(),
            )),
        ];

        Self {
            steps,
            blob_store,
            ephemeral: Arc::new(InMemoryEphemeralStore::new()),
        }
    }

    /// Replaces the ephemeral run cache.
    pub fn with_ephemeral_store(mut self, ephemeral: Arc<dyn EphemeralStore>) -> Self {
        self.ephemeral = ephemeral;
        self
    }

    /// Steps in execution order.
    pub fn steps(&self) -> impl Iterator<Item = &dyn Step> {
        self.steps.iter().map(|step| step.as_ref())
    }

    /// Runs the pipeline once.
    pub async fn run(&self, input_text: &str, image: Option<InputImage>) -> PipelineOutcome {
        self.run_with_cancellation(input_text, image, CancellationToken::new())
            .await
    }

    /// Runs the pipeline once, stopping early if `cancel` fires.
    ///
    /// A token cancelled before the inputs are stored stops the run at
    /// `setup` without touching either store.
    ///
    /// The run's ephemeral artifacts are evicted before returning. Durable
    /// artifacts already written are left in place.
    pub async fn run_with_cancellation(
        &self,
        input_text: &str,
        image: Option<InputImage>,
        cancel: CancellationToken,
    ) -> PipelineOutcome {
        let mut ctx = RunContext::new(Arc::clone(&self.blob_store), Arc::clone(&self.ephemeral));

        let setup = if cancel.is_cancelled() {
            Err(StepError::new(StepErrorKind::Cancelled))
        } else {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(StepError::new(StepErrorKind::Cancelled)),
                result = ctx.record_inputs(input_text, image) => result.map_err(classify_error),
            }
        };

        let outcome = match setup {
            Ok(()) => self.execute(&mut ctx, &cancel).await,
            Err(err) => {
                error!(run_id = %ctx.run_id(), error = %err, "Run setup failed");
                PipelineOutcome::failed(ctx.run_id(), StepName::Setup, &err)
            }
        };

        ctx.evict_ephemeral().await;
        outcome
    }

    /// Runs every step against a prepared context.
    ///
    /// Before each step the cancellation token and the step's inputs are
    /// checked; the first failure ends the run.
    #[instrument(skip_all, fields(run_id = %ctx.run_id()))]
    pub async fn execute(&self, ctx: &mut RunContext, cancel: &CancellationToken) -> PipelineOutcome {
        let run_id = ctx.run_id();
        let mut status = RunStatus::NotStarted;

        for step in &self.steps {
            let name = step.name();
            transition(&mut status, RunStatus::Running { step: name });

            let result = if cancel.is_cancelled() {
                Err(StepError::new(StepErrorKind::Cancelled))
            } else if let Err(e) = step.check_inputs(ctx.state()) {
                Err(e)
            } else {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(StepError::new(StepErrorKind::Cancelled)),
                    result = step.run(ctx) => result,
                }
            };

            if let Err(err) = result {
                error!(step = %name, kind = %err.failure_kind(), error = %err, "Step failed");
                let outcome = PipelineOutcome::failed(run_id, name, &err);
                transition(&mut status, outcome.status);
                return outcome;
            }
        }

        let state = ctx.state();
        let outputs = match (
            state.character_description(),
            state.full_narrative(),
            state.illustrated_scenes(),
            state.audiobook(),
        ) {
            (Some(character), Some(narrative), Some(scenes), Some(audio)) => StoryOutputs {
                character_description: character.to_string(),
                full_narrative: narrative.to_string(),
                illustrated_scenes: scenes.to_vec(),
                audiobook_uri: audio.uri.clone(),
            },
            _ => {
                // A step reported success without writing its keys
                let step = self.steps.last().map(|s| s.name()).unwrap_or(StepName::Setup);
                let err = StepError::new(StepErrorKind::MissingInput(
                    "run finished without all story outputs".to_string(),
                ));
                let outcome = PipelineOutcome::failed(run_id, step, &err);
                transition(&mut status, outcome.status);
                return outcome;
            }
        };

        transition(&mut status, RunStatus::Succeeded);
        PipelineOutcome {
            run_id,
            status,
            outputs: Some(outputs),
            error: None,
        }
    }
}

fn transition(status: &mut RunStatus, next: RunStatus) {
    info!(from = %status, to = %next, "Run status changed");
    *status = next;
}
