//! Sequential story pipeline for Bedtime.
//!
//! A run turns a prompt and a photo into an illustrated, narrated story by
//! running four steps in a fixed order:
//!
//! 1. [`CharacterDescriber`]: photo to cartoon character description
//! 2. [`StoryWriter`]: description and prompt to scenes and narrative
//! 3. [`SceneIllustrator`]: one image per scene, in story order
//! 4. [`AudiobookGenerator`]: narrative to narrated audio
//!
//! Steps exchange data only through the run's [`RunState`], whose keys are
//! written once. Artifacts go through [`RunContext`], which namespaces them by
//! run and keeps a same-run copy in an ephemeral store. The first failing
//! step ends the run and is named in the [`PipelineOutcome`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod extraction;
mod pipeline;
mod state;
mod step;
mod steps;

pub use config::{DEFAULT_ART_STYLE, DEFAULT_THEME, PipelineConfig};
pub use context::{EPHEMERAL_URI_SCHEME, InputImage, Run, RunContext, USER_IMAGE_ARTIFACT};
pub use extraction::{StoryDraft, extract_json, parse_json};
pub use pipeline::{FailureReport, PipelineOutcome, RunStatus, StoryOutputs, StoryPipeline};
pub use state::{IllustratedScene, RunState, StateKey, StateValue};
pub use step::{Step, StepName, classify_error};
pub use steps::{
    AUDIOBOOK_ARTIFACT, AudiobookGenerator, CHARACTER_PROMPT, CharacterDescriber,
    SceneIllustrator, StoryWriter,
};
