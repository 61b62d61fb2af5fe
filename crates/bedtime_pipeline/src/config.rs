//! Pipeline configuration.

use bedtime_core::VoiceConfig;
use serde::{Deserialize, Serialize};

/// Art style appended to every scene prompt unless configured otherwise.
pub const DEFAULT_ART_STYLE: &str =
    "in a gentle, friendly cartoon style suitable for a children's bedtime story";

/// Story theme used when the caller's prompt is blank.
pub const DEFAULT_THEME: &str = "a fun adventure";

/// Settings shared by the four story steps.
///
/// # Examples
///
/// ```
/// use bedtime_pipeline::PipelineConfig;
///
/// let config: PipelineConfig = toml::from_str(r#"
///     image_model = "gemini-2.5-flash-image"
///     max_concurrent_illustrations = 2
///
///     [voice]
///     voice_name = "Kore"
/// "#).unwrap();
///
/// assert_eq!(config.max_concurrent_illustrations, 2);
/// assert_eq!(config.voice.voice_name, "Kore");
/// assert_eq!(config.default_theme, "a fun adventure");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Model for story writing
    #[serde(default = "default_text_model")]
    pub text_model: String,
    /// Model for describing the user's photo
    #[serde(default = "default_text_model")]
    pub vision_model: String,
    /// Model for scene illustrations
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Model for narration
    #[serde(default = "default_speech_model")]
    pub speech_model: String,
    /// Style clause inserted into every scene prompt
    #[serde(default = "default_art_style")]
    pub art_style: String,
    /// Theme used when the prompt is blank
    #[serde(default = "default_theme")]
    pub default_theme: String,
    /// Narrator voice
    #[serde(default)]
    pub voice: VoiceConfig,
    /// Upper bound on in-flight illustration calls
    #[serde(default = "default_max_concurrent_illustrations")]
    pub max_concurrent_illustrations: usize,
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_speech_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}

fn default_art_style() -> String {
    DEFAULT_ART_STYLE.to_string()
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

fn default_max_concurrent_illustrations() -> usize {
    4
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            text_model: default_text_model(),
            vision_model: default_text_model(),
            image_model: default_image_model(),
            speech_model: default_speech_model(),
            art_style: default_art_style(),
            default_theme: default_theme(),
            voice: VoiceConfig::default(),
            max_concurrent_illustrations: default_max_concurrent_illustrations(),
        }
    }
}
