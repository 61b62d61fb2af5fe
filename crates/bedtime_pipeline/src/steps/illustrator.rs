//! Scene illustration.

use crate::context::RunContext;
use crate::state::{IllustratedScene, StateKey, StateValue};
use crate::step::{Step, StepName, classify_error, generation_failed};
use async_trait::async_trait;
use bedtime_core::{GenerateRequest, Input, Modality};
use bedtime_error::{StepError, StepErrorKind};
use bedtime_interface::GenerationDriver;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Illustrates every scene with the described character.
///
/// Scenes are generated concurrently up to a bound but always recorded in
/// story order. Nothing is recorded unless every scene succeeds.
pub struct SceneIllustrator {
    driver: Arc<dyn GenerationDriver>,
    model: String,
    art_style: String,
    max_concurrent: usize,
}

impl SceneIllustrator {
    /// Creates the step. A bound of zero is treated as one.
    pub fn new(
        driver: Arc<dyn GenerationDriver>,
        model: impl Into<String>,
        art_style: impl Into<String>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            driver,
            model: model.into(),
            art_style: art_style.into(),
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// The image prompt for one scene.
    ///
    /// ```
    /// use bedtime_pipeline::SceneIllustrator;
    ///
    /// assert_eq!(
    ///     SceneIllustrator::prompt("A fox", "watercolor", "The fox naps"),
    ///     "A fox, watercolor. Scene: The fox naps"
    /// );
    /// ```
    pub fn prompt(character: &str, art_style: &str, scene: &str) -> String {
        format!("{character}, {art_style}. Scene: {scene}")
    }

    async fn illustrate(
        &self,
        ctx: &RunContext,
        character: &str,
        index: usize,
        scene_text: String,
    ) -> Result<IllustratedScene, StepError> {
        let request = GenerateRequest::builder()
            .modality(Modality::TextToImage)
            .inputs(vec![Input::Text(Self::prompt(
                character,
                &self.art_style,
                &scene_text,
            ))])
            .model(self.model.clone())
            .build()
            .map_err(|e| generation_failed(format!("scene {index}: {e}")))?;

        let response = self
            .driver
            .generate(&request)
            .await
            .map_err(|e| generation_failed(format!("scene {index}: {e}")))?;

        let (mime, data) = response
            .image()
            .filter(|(_, data)| !data.is_empty())
            .map(|(mime, data)| (mime.to_string(), data.to_vec()))
            .ok_or_else(|| generation_failed(format!("scene {index}: no image returned")))?;

        let artifact = ctx
            .put_artifact(&format!("scene_{index}"), data, &mime)
            .await
            .map_err(|e| {
                let err = classify_error(e);
                StepError::new(match err.kind {
                    StepErrorKind::Storage(m) => StepErrorKind::Storage(format!("scene {index}: {m}")),
                    other => other,
                })
            })?;
        debug!(index, uri = %artifact.uri, "Scene illustrated");

        Ok(IllustratedScene {
            index,
            scene_text,
            artifact,
        })
    }
}

#[async_trait]
impl Step for SceneIllustrator {
    fn name(&self) -> StepName {
        StepName::SceneIllustrator
    }

    fn requires(&self) -> &'static [StateKey] {
        &[StateKey::CharacterDescription, StateKey::StoryScenes]
    }

    fn produces(&self) -> &'static [StateKey] {
        &[StateKey::IllustratedScenes]
    }

    #[instrument(
        skip_all,
        fields(run_id = %ctx.run_id(), model = %self.model, max_concurrent = self.max_concurrent)
    )]
    async fn run(&self, ctx: &mut RunContext) -> Result<(), StepError> {
        if !self.driver.supports(Modality::TextToImage) {
            return Err(generation_failed(format!(
                "{} cannot generate images",
                self.driver.provider_name()
            )));
        }

        let character = ctx
            .state()
            .require_text(StateKey::CharacterDescription)?
            .to_string();
        let scenes = ctx
            .state()
            .story_scenes()
            .map(<[String]>::to_vec)
            .ok_or_else(|| crate::state::missing(StateKey::StoryScenes))?;
        let scene_count = scenes.len();

        let illustrated: Vec<IllustratedScene> = {
            let shared: &RunContext = ctx;
            let character = character.as_str();
            stream::iter(scenes.into_iter().enumerate())
                .map(|(index, text)| self.illustrate(shared, character, index, text))
                .buffered(self.max_concurrent)
                .try_collect()
                .await?
        };
        info!(scenes = scene_count, "All scenes illustrated");

        ctx.state_mut().set(
            StateKey::IllustratedScenes,
            StateValue::IllustratedScenes(illustrated),
        )
    }
}
