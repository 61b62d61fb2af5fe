//! The step abstraction shared by all story steps.

use crate::context::RunContext;
use crate::state::{RunState, StateKey, missing};
use async_trait::async_trait;
use bedtime_error::{BedtimeError, BedtimeErrorKind, StepError, StepErrorKind};
use serde::{Deserialize, Serialize};

/// Stage names reported in run status and failures.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StepName {
    /// Recording the caller's inputs
    Setup,
    /// Describing the character from the photo
    CharacterDescription,
    /// Writing the scenes and narrative
    StoryWriter,
    /// Illustrating every scene
    SceneIllustrator,
    /// Narrating the story
    AudiobookGenerator,
}

/// One stage of the story pipeline.
///
/// A step reads the keys it [`requires`](Step::requires) from run state and
/// writes the keys it [`produces`](Step::produces). It never retries.
#[async_trait]
pub trait Step: Send + Sync {
    /// Stage name.
    fn name(&self) -> StepName;

    /// Keys that must be present before the step runs.
    fn requires(&self) -> &'static [StateKey];

    /// Keys the step writes on success.
    fn produces(&self) -> &'static [StateKey];

    /// Checks required inputs before the step is invoked.
    fn check_inputs(&self, state: &RunState) -> Result<(), StepError> {
        match self.requires().iter().find(|key| !state.contains(**key)) {
            Some(key) => Err(missing(*key)),
            None => Ok(()),
        }
    }

    /// Performs the step against a run.
    async fn run(&self, ctx: &mut RunContext) -> Result<(), StepError>;
}

/// Classify a lower-level failure into the step taxonomy.
///
/// Missing artifacts become `ArtifactNotFound`, other storage failures
/// `Storage`, JSON failures `Parse`, and everything else `Generation`.
pub fn classify_error(err: BedtimeError) -> StepError {
    let kind = match err.into_kind() {
        BedtimeErrorKind::Step(step) => return step,
        BedtimeErrorKind::Storage(e) if e.is_not_found() => {
            StepErrorKind::ArtifactNotFound(e.kind.to_string())
        }
        BedtimeErrorKind::Storage(e) => StepErrorKind::Storage(e.kind.to_string()),
        BedtimeErrorKind::Json(e) => StepErrorKind::Parse(e.kind.to_string()),
        BedtimeErrorKind::Generation(e) => StepErrorKind::Generation(e.kind.to_string()),
        BedtimeErrorKind::Config(e) => StepErrorKind::Generation(e.kind.to_string()),
    };
    StepError::new(kind)
}

/// A failed or unusable generation call.
pub(crate) fn generation_failed(detail: impl std::fmt::Display) -> StepError {
    StepError::new(StepErrorKind::Generation(detail.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bedtime_error::{
        ConfigError, ConfigErrorKind, FailureKind, GenerationError, GenerationErrorKind, JsonError,
        JsonErrorKind, StorageError, StorageErrorKind,
    };

    #[test]
    fn storage_not_found_is_artifact_not_found() {
        let err: BedtimeError =
            StorageError::new(StorageErrorKind::NotFound("scene_0".to_string())).into();
        assert_eq!(classify_error(err).failure_kind(), FailureKind::ArtifactNotFound);
    }

    #[test]
    fn storage_write_is_storage() {
        let err: BedtimeError = StorageError::new(StorageErrorKind::Write("disk".to_string())).into();
        assert_eq!(classify_error(err).failure_kind(), FailureKind::StorageError);
    }

    #[test]
    fn json_is_parse() {
        let err: BedtimeError = JsonError::new(JsonErrorKind::NoPayload(12)).into();
        assert_eq!(classify_error(err).failure_kind(), FailureKind::ParseError);
    }

    #[test]
    fn config_is_generation() {
        let err: BedtimeError =
            ConfigError::new(ConfigErrorKind::Shape("gemini.timeout_secs".into())).into();
        let step = classify_error(err);
        assert_eq!(step.failure_kind(), FailureKind::GenerationError);
        assert!(step.kind.detail().contains("gemini.timeout_secs"));
    }

    #[test]
    fn generation_is_generation() {
        let err: BedtimeError = GenerationError::new(GenerationErrorKind::Blocked("SAFETY".into())).into();
        let step = classify_error(err);
        assert_eq!(step.failure_kind(), FailureKind::GenerationError);
        assert!(step.kind.detail().contains("SAFETY"));
    }

    #[test]
    fn step_errors_pass_through() {
        let err: BedtimeError = StepError::new(StepErrorKind::Cancelled).into();
        assert_eq!(classify_error(err).failure_kind(), FailureKind::Cancelled);
    }
}
