//! Generation modalities.

use serde::{Deserialize, Serialize};

/// The kind of transformation a generation call performs.
///
/// # Examples
///
/// ```
/// use bedtime_core::Modality;
///
/// assert_eq!(Modality::TextToSpeech.to_string(), "text-to-speech");
/// assert!(Modality::VisionToText.produces_text());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum Modality {
    /// Text prompt to text
    #[display("text")]
    Text,
    /// Image plus text prompt to text
    #[display("vision-to-text")]
    VisionToText,
    /// Text prompt to image
    #[display("text-to-image")]
    TextToImage,
    /// Text to synthesized speech
    #[display("text-to-speech")]
    TextToSpeech,
}

impl Modality {
    /// Whether the primary output of this modality is text.
    pub fn produces_text(&self) -> bool {
        matches!(self, Modality::Text | Modality::VisionToText)
    }
}
