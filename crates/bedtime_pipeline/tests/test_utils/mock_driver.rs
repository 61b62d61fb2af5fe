//! Scripted generation driver.

use async_trait::async_trait;
use bedtime_core::{GenerateRequest, GenerateResponse, Modality, Output};
use bedtime_error::{BedtimeResult, GenerationError, GenerationErrorKind};
use bedtime_interface::GenerationDriver;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Driver whose answers are fixed per modality.
///
/// Image requests are matched to scenes by the text after `Scene: ` in the
/// prompt, so tests can delay or fail individual scenes.
pub struct MockStoryDriver {
    character: Result<String, GenerationErrorKind>,
    story: String,
    story_delay: Duration,
    story_error: Option<GenerationErrorKind>,
    audio: Vec<u8>,
    speech_error: Option<GenerationErrorKind>,
    scene_delays: HashMap<String, Duration>,
    failing_scenes: Vec<String>,
    calls: Mutex<Vec<Modality>>,
    requests: Mutex<Vec<GenerateRequest>>,
    completed_scenes: Mutex<Vec<String>>,
}

impl MockStoryDriver {
    /// A driver that succeeds for every modality with the given scenes.
    pub fn happy(scenes: &[&str]) -> Self {
        Self {
            character: Ok("A cheerful cartoon fox with a blue scarf".to_string()),
            story: super::story_json(scenes),
            story_delay: Duration::ZERO,
            story_error: None,
            audio: b"RIFF\x24\x00\x00\x00WAVE".to_vec(),
            speech_error: None,
            scene_delays: HashMap::new(),
            failing_scenes: Vec::new(),
            calls: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            completed_scenes: Mutex::new(Vec::new()),
        }
    }

    /// Replace the raw story response.
    pub fn with_story_response(mut self, raw: impl Into<String>) -> Self {
        self.story = raw.into();
        self
    }

    /// Delay the story response.
    pub fn with_story_delay(mut self, delay: Duration) -> Self {
        self.story_delay = delay;
        self
    }

    /// Make the story call fail.
    pub fn with_story_error(mut self, kind: GenerationErrorKind) -> Self {
        self.story_error = Some(kind);
        self
    }

    /// Make the speech call fail.
    pub fn with_speech_error(mut self, kind: GenerationErrorKind) -> Self {
        self.speech_error = Some(kind);
        self
    }

    /// Make the character call fail.
    pub fn with_character_error(mut self, kind: GenerationErrorKind) -> Self {
        self.character = Err(kind);
        self
    }

    /// Delay the illustration of one scene.
    pub fn with_scene_delay(mut self, scene: &str, delay: Duration) -> Self {
        self.scene_delays.insert(scene.to_string(), delay);
        self
    }

    /// Make the illustration of one scene fail.
    pub fn with_failing_scene(mut self, scene: &str) -> Self {
        self.failing_scenes.push(scene.to_string());
        self
    }

    /// Return empty audio.
    pub fn with_empty_audio(mut self) -> Self {
        self.audio = Vec::new();
        self
    }

    /// Modalities requested, in call order.
    pub fn calls(&self) -> Vec<Modality> {
        self.calls.lock().unwrap().clone()
    }

    /// Requests received, in call order.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of calls for one modality.
    pub fn count(&self, modality: Modality) -> usize {
        self.calls().into_iter().filter(|m| *m == modality).count()
    }

    /// Scenes in the order their illustrations finished.
    pub fn completed_scenes(&self) -> Vec<String> {
        self.completed_scenes.lock().unwrap().clone()
    }

    fn error(kind: GenerationErrorKind) -> bedtime_error::BedtimeError {
        GenerationError::new(kind).into()
    }
}

#[async_trait]
impl GenerationDriver for MockStoryDriver {
    async fn generate(&self, req: &GenerateRequest) -> BedtimeResult<GenerateResponse> {
        self.calls.lock().unwrap().push(*req.modality());
        self.requests.lock().unwrap().push(req.clone());

        match req.modality() {
            Modality::VisionToText => match &self.character {
                Ok(text) => Ok(GenerateResponse {
                    outputs: vec![Output::Text(text.clone())],
                }),
                Err(kind) => Err(Self::error(kind.clone())),
            },
            Modality::Text => {
                if !self.story_delay.is_zero() {
                    tokio::time::sleep(self.story_delay).await;
                }
                if let Some(kind) = &self.story_error {
                    return Err(Self::error(kind.clone()));
                }
                Ok(GenerateResponse {
                    outputs: vec![Output::Text(self.story.clone())],
                })
            }
            Modality::TextToImage => {
                let prompt = req.prompt_text();
                let scene = prompt
                    .split_once("Scene: ")
                    .map(|(_, scene)| scene.to_string())
                    .unwrap_or_default();

                if let Some(delay) = self.scene_delays.get(&scene) {
                    tokio::time::sleep(*delay).await;
                }
                if self.failing_scenes.contains(&scene) {
                    return Err(Self::error(GenerationErrorKind::HttpError {
                        status_code: 500,
                        message: format!("could not draw {scene}"),
                    }));
                }

                self.completed_scenes.lock().unwrap().push(scene.clone());
                Ok(GenerateResponse {
                    outputs: vec![Output::Image {
                        mime: "image/png".to_string(),
                        data: scene.into_bytes(),
                    }],
                })
            }
            Modality::TextToSpeech => match &self.speech_error {
                Some(kind) => Err(Self::error(kind.clone())),
                None => Ok(GenerateResponse {
                    outputs: vec![Output::Audio {
                        mime: "audio/wav".to_string(),
                        data: self.audio.clone(),
                    }],
                }),
            },
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
