//! The four story steps, in pipeline order.

mod audiobook;
mod character;
mod illustrator;
mod story;

pub use audiobook::{AUDIOBOOK_ARTIFACT, AudiobookGenerator};
pub use character::{CHARACTER_PROMPT, CharacterDescriber};
pub use illustrator::SceneIllustrator;
pub use story::StoryWriter;
