//! Typed, write-once state shared between the steps of one run.

use bedtime_error::{StepError, StepErrorKind};
use bedtime_storage::ArtifactReference;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Keys a run can hold.
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
pub enum StateKey {
    /// The caller's story prompt
    InputText,
    /// Reference to the caller's photo
    UserImage,
    /// Cartoon description of the main character
    CharacterDescription,
    /// Ordered scene texts
    StoryScenes,
    /// Whole story as one narrative
    FullNarrative,
    /// Scenes paired with their illustrations, in story order
    IllustratedScenes,
    /// Reference to the narrated story
    Audiobook,
}

impl StateKey {
    fn expected_shape(self) -> &'static str {
        match self {
            StateKey::InputText | StateKey::CharacterDescription | StateKey::FullNarrative => {
                "text"
            }
            StateKey::UserImage | StateKey::Audiobook => "artifact",
            StateKey::StoryScenes => "scenes",
            StateKey::IllustratedScenes => "illustrated_scenes",
        }
    }
}

/// A story scene with its stored illustration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IllustratedScene {
    /// Position in the story, starting at 0
    pub index: usize,
    /// Scene narrative
    pub scene_text: String,
    /// Stored illustration
    pub artifact: ArtifactReference,
}

/// A state value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    /// Free text
    Text(String),
    /// A stored artifact
    Artifact(ArtifactReference),
    /// Ordered scene texts
    Scenes(Vec<String>),
    /// Ordered illustrated scenes
    IllustratedScenes(Vec<IllustratedScene>),
}

impl StateValue {
    fn shape(&self) -> &'static str {
        match self {
            StateValue::Text(_) => "text",
            StateValue::Artifact(_) => "artifact",
            StateValue::Scenes(_) => "scenes",
            StateValue::IllustratedScenes(_) => "illustrated_scenes",
        }
    }
}

/// Per-run key/value state.
///
/// Every key is written at most once, and list values are written whole, so a
/// reader never observes a partially built list.
///
/// # Examples
///
/// ```
/// use bedtime_pipeline::{RunState, StateKey, StateValue};
///
/// let mut state = RunState::new();
/// state
///     .set(StateKey::CharacterDescription, StateValue::Text("A fox".to_string()))
///     .unwrap();
///
/// assert_eq!(state.character_description(), Some("A fox"));
/// assert!(state
///     .set(StateKey::CharacterDescription, StateValue::Text("A bear".to_string()))
///     .is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    values: BTreeMap<StateKey, StateValue>,
}

impl RunState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a raw value.
    pub fn get(&self, key: StateKey) -> Option<&StateValue> {
        self.values.get(&key)
    }

    /// Whether a key has been written.
    pub fn contains(&self, key: StateKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Keys written so far, in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = StateKey> + '_ {
        self.values.keys().copied()
    }

    /// Writes a key once.
    ///
    /// # Errors
    ///
    /// `StateConflict` if the key already holds a value or the value has the
    /// wrong shape for the key.
    pub fn set(&mut self, key: StateKey, value: StateValue) -> Result<(), StepError> {
        if value.shape() != key.expected_shape() {
            return Err(StepError::new(StepErrorKind::StateConflict(format!(
                "{} expects a {} value, got {}",
                key,
                key.expected_shape(),
                value.shape()
            ))));
        }
        if self.values.contains_key(&key) {
            return Err(StepError::new(StepErrorKind::StateConflict(key.to_string())));
        }
        debug!(key = %key, "Setting state value");
        self.values.insert(key, value);
        Ok(())
    }

    fn text(&self, key: StateKey) -> Option<&str> {
        match self.values.get(&key) {
            Some(StateValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    fn artifact(&self, key: StateKey) -> Option<&ArtifactReference> {
        match self.values.get(&key) {
            Some(StateValue::Artifact(reference)) => Some(reference),
            _ => None,
        }
    }

    /// The caller's prompt.
    pub fn input_text(&self) -> Option<&str> {
        self.text(StateKey::InputText)
    }

    /// The caller's photo.
    pub fn user_image(&self) -> Option<&ArtifactReference> {
        self.artifact(StateKey::UserImage)
    }

    /// The character description.
    pub fn character_description(&self) -> Option<&str> {
        self.text(StateKey::CharacterDescription)
    }

    /// Scene texts in story order.
    pub fn story_scenes(&self) -> Option<&[String]> {
        match self.values.get(&StateKey::StoryScenes) {
            Some(StateValue::Scenes(scenes)) => Some(scenes),
            _ => None,
        }
    }

    /// The whole narrative.
    pub fn full_narrative(&self) -> Option<&str> {
        self.text(StateKey::FullNarrative)
    }

    /// Illustrated scenes in story order.
    pub fn illustrated_scenes(&self) -> Option<&[IllustratedScene]> {
        match self.values.get(&StateKey::IllustratedScenes) {
            Some(StateValue::IllustratedScenes(scenes)) => Some(scenes),
            _ => None,
        }
    }

    /// The narrated story.
    pub fn audiobook(&self) -> Option<&ArtifactReference> {
        self.artifact(StateKey::Audiobook)
    }

    /// Text under `key`, or `MissingInput`.
    pub fn require_text(&self, key: StateKey) -> Result<&str, StepError> {
        self.text(key).ok_or_else(|| missing(key))
    }
}

pub(crate) fn missing(key: StateKey) -> StepError {
    StepError::new(StepErrorKind::MissingInput(format!(
        "'{}' has not been produced",
        key
    )))
}
