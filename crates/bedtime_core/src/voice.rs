//! Speech synthesis configuration.

use serde::{Deserialize, Serialize};

/// Container format requested for synthesized speech.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum AudioEncoding {
    /// RIFF/WAVE container around 16-bit PCM
    #[default]
    #[display("wav")]
    Wav,
    /// Raw 16-bit little-endian PCM
    #[display("pcm")]
    Pcm,
}

impl AudioEncoding {
    /// MIME type of audio in this encoding.
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioEncoding::Wav => "audio/wav",
            AudioEncoding::Pcm => "audio/L16",
        }
    }
}

/// Voice and encoding used for text-to-speech requests.
///
/// # Examples
///
/// ```
/// use bedtime_core::{AudioEncoding, VoiceConfig};
///
/// let voice = VoiceConfig::default();
/// assert_eq!(voice.language_code, "en-US");
/// assert_eq!(voice.encoding, AudioEncoding::Wav);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// BCP-47 language code
    #[serde(default = "default_language_code")]
    pub language_code: String,
    /// Provider voice name
    #[serde(default = "default_voice_name")]
    pub voice_name: String,
    /// Output encoding
    #[serde(default)]
    pub encoding: AudioEncoding,
}

fn default_language_code() -> String {
    "en-US".to_string()
}

fn default_voice_name() -> String {
    "Sulafat".to_string()
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            language_code: default_language_code(),
            voice_name: default_voice_name(),
            encoding: AudioEncoding::default(),
        }
    }
}
