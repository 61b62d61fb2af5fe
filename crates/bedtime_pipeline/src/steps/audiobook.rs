//! Narration.

use crate::context::RunContext;
use crate::state::{StateKey, StateValue};
use crate::step::{Step, StepName, classify_error, generation_failed};
use async_trait::async_trait;
use bedtime_core::{GenerateRequest, Input, Modality, VoiceConfig};
use bedtime_error::StepError;
use bedtime_interface::GenerationDriver;
use std::sync::Arc;
use tracing::{info, instrument};

/// Artifact name of the narrated story.
pub const AUDIOBOOK_ARTIFACT: &str = "story_audio";

/// Narrates the full story with the configured voice.
pub struct AudiobookGenerator {
    driver: Arc<dyn GenerationDriver>,
    model: String,
    voice: VoiceConfig,
}

impl AudiobookGenerator {
    /// Creates the step.
    pub fn new(
        driver: Arc<dyn GenerationDriver>,
        model: impl Into<String>,
        voice: VoiceConfig,
    ) -> Self {
        Self {
            driver,
            model: model.into(),
            voice,
        }
    }
}

#[async_trait]
impl Step for AudiobookGenerator {
    fn name(&self) -> StepName {
        StepName::AudiobookGenerator
    }

    fn requires(&self) -> &'static [StateKey] {
        &[StateKey::FullNarrative]
    }

    fn produces(&self) -> &'static [StateKey] {
        &[StateKey::Audiobook]
    }

    #[instrument(skip_all, fields(run_id = %ctx.run_id(), voice = %self.voice.voice_name))]
    async fn run(&self, ctx: &mut RunContext) -> Result<(), StepError> {
        if !self.driver.supports(Modality::TextToSpeech) {
            return Err(generation_failed(format!(
                "{} cannot synthesize speech",
                self.driver.provider_name()
            )));
        }

        let narrative = ctx
            .state()
            .require_text(StateKey::FullNarrative)?
            .to_string();

        let request = GenerateRequest::builder()
            .modality(Modality::TextToSpeech)
            .inputs(vec![Input::Text(narrative)])
            .model(self.model.clone())
            .voice(Some(self.voice.clone()))
            .build()
            .map_err(generation_failed)?;

        let response = self
            .driver
            .generate(&request)
            .await
            .map_err(generation_failed)?;

        let (mime, data) = response
            .audio()
            .filter(|(_, data)| !data.is_empty())
            .map(|(mime, data)| (mime.to_string(), data.to_vec()))
            .ok_or_else(|| generation_failed("no audio returned"))?;

        let reference = ctx
            .put_artifact(AUDIOBOOK_ARTIFACT, data, &mime)
            .await
            .map_err(classify_error)?;
        info!(uri = %reference.uri, size = reference.size_bytes, "Audiobook stored");

        ctx.state_mut()
            .set(StateKey::Audiobook, StateValue::Artifact(reference))
    }
}
