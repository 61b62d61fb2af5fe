//! Story writing.

use crate::context::RunContext;
use crate::extraction::StoryDraft;
use crate::state::{StateKey, StateValue};
use crate::step::{Step, StepName, classify_error, generation_failed};
use async_trait::async_trait;
use bedtime_core::{GenerateRequest, Input, Modality, ResponseFormat};
use bedtime_error::StepError;
use bedtime_interface::GenerationDriver;
use std::sync::Arc;
use tracing::{info, instrument};

/// Writes a 6-7 scene story about the described character.
pub struct StoryWriter {
    driver: Arc<dyn GenerationDriver>,
    model: String,
    default_theme: String,
}

impl StoryWriter {
    /// Creates the step.
    pub fn new(
        driver: Arc<dyn GenerationDriver>,
        model: impl Into<String>,
        default_theme: impl Into<String>,
    ) -> Self {
        Self {
            driver,
            model: model.into(),
            default_theme: default_theme.into(),
        }
    }

    /// The writer prompt for a character and theme.
    pub fn prompt(character: &str, theme: &str) -> String {
        format!(
            "You are a creative author of children's bedtime stories. \
             Your task is to write a short, gentle, and positive story with 6-7 scenes. \
             The main character is: {character}.\n\
             The story should be about: {theme}.\n\
             Your output must be a JSON object containing two keys: 'story_scenes' \
             (a list of strings, where each string is a scene's narrative) and 'full_narrative' \
             (the concatenated text of all scenes)."
        )
    }
}

#[async_trait]
impl Step for StoryWriter {
    fn name(&self) -> StepName {
        StepName::StoryWriter
    }

    fn requires(&self) -> &'static [StateKey] {
        &[StateKey::CharacterDescription]
    }

    fn produces(&self) -> &'static [StateKey] {
        &[StateKey::StoryScenes, StateKey::FullNarrative]
    }

    #[instrument(skip_all, fields(run_id = %ctx.run_id(), model = %self.model))]
    async fn run(&self, ctx: &mut RunContext) -> Result<(), StepError> {
        let character = ctx.state().require_text(StateKey::CharacterDescription)?;
        let theme = ctx
            .state()
            .input_text()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(&self.default_theme);

        let request = GenerateRequest::builder()
            .modality(Modality::Text)
            .inputs(vec![Input::Text(Self::prompt(character, theme))])
            .model(self.model.clone())
            .response_format(ResponseFormat::Json)
            .build()
            .map_err(generation_failed)?;

        let response = self
            .driver
            .generate(&request)
            .await
            .map_err(generation_failed)?;
        let raw = response
            .text()
            .ok_or_else(|| generation_failed("story response contained no text"))?;

        let draft = StoryDraft::from_response(&raw).map_err(classify_error)?;
        info!(scenes = draft.story_scenes.len(), "Story written");

        let state = ctx.state_mut();
        state.set(StateKey::StoryScenes, StateValue::Scenes(draft.story_scenes))?;
        state.set(
            StateKey::FullNarrative,
            StateValue::Text(draft.full_narrative),
        )
    }
}
