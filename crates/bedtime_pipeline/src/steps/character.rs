//! Character description from the caller's photo.

use crate::context::RunContext;
use crate::state::{RunState, StateKey, StateValue};
use crate::step::{Step, StepName, classify_error, generation_failed};
use async_trait::async_trait;
use bedtime_core::{GenerateRequest, Input, Modality};
use bedtime_error::{StepError, StepErrorKind};
use bedtime_interface::GenerationDriver;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Instruction sent alongside the photo.
///
/// The description must stay a cartoon and never describe the real child.
pub const CHARACTER_PROMPT: &str = "You are a creative assistant. Analyze the provided image of a \
child and create a detailed, friendly, and imaginative description of a cartoon character \
inspired by the child. Focus on key features like hair color, eye color, and clothing, but \
translate them into a charming cartoon style. Do not mention or describe the real child. The \
description should be reusable as a prompt for generating images of this character. For \
example: 'A cheerful cartoon boy with curly brown hair, bright blue eyes, and wearing a red \
t-shirt with a star on it.'";

/// Turns the user's photo into a reusable cartoon character description.
pub struct CharacterDescriber {
    driver: Arc<dyn GenerationDriver>,
    model: String,
}

impl CharacterDescriber {
    /// Creates the step.
    pub fn new(driver: Arc<dyn GenerationDriver>, model: impl Into<String>) -> Self {
        Self {
            driver,
            model: model.into(),
        }
    }
}

fn no_image() -> StepError {
    StepError::new(StepErrorKind::MissingInput("no image supplied".to_string()))
}

#[async_trait]
impl Step for CharacterDescriber {
    fn name(&self) -> StepName {
        StepName::CharacterDescription
    }

    fn requires(&self) -> &'static [StateKey] {
        &[StateKey::UserImage]
    }

    fn produces(&self) -> &'static [StateKey] {
        &[StateKey::CharacterDescription]
    }

    fn check_inputs(&self, state: &RunState) -> Result<(), StepError> {
        state.user_image().map(|_| ()).ok_or_else(no_image)
    }

    #[instrument(skip_all, fields(run_id = %ctx.run_id(), model = %self.model))]
    async fn run(&self, ctx: &mut RunContext) -> Result<(), StepError> {
        let image = ctx.state().user_image().cloned().ok_or_else(no_image)?;
        let data = ctx.get_artifact(&image.name).await.map_err(classify_error)?;

        if !self.driver.supports(Modality::VisionToText) {
            return Err(generation_failed(format!(
                "{} cannot describe images",
                self.driver.provider_name()
            )));
        }

        let request = GenerateRequest::builder()
            .modality(Modality::VisionToText)
            .inputs(vec![
                Input::Image {
                    mime: image.mime_type.clone(),
                    data,
                },
                Input::Text(CHARACTER_PROMPT.to_string()),
            ])
            .model(self.model.clone())
            .build()
            .map_err(generation_failed)?;

        let response = self
            .driver
            .generate(&request)
            .await
            .map_err(generation_failed)?;

        let description = response
            .text()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| generation_failed("empty character description"))?;
        debug!(chars = description.len(), "Character described");

        ctx.state_mut().set(
            StateKey::CharacterDescription,
            StateValue::Text(description),
        )
    }
}
