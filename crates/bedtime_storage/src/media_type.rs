//! Media type enumeration.

use serde::{Deserialize, Serialize};

/// Type of artifact content.
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
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Image content (PNG, JPEG, WebP)
    #[display("image")]
    Image,
    /// Audio content (WAV, PCM, MP3)
    #[display("audio")]
    Audio,
    /// Anything else
    #[display("other")]
    Other,
}

impl MediaType {
    /// Classify a MIME type.
    ///
    /// ```
    /// use bedtime_storage::MediaType;
    ///
    /// assert_eq!(MediaType::from_mime("image/png"), MediaType::Image);
    /// assert_eq!(MediaType::from_mime("audio/L16;codec=pcm;rate=24000"), MediaType::Audio);
    /// assert_eq!(MediaType::from_mime("application/json"), MediaType::Other);
    /// ```
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        if essence.starts_with("image/") {
            MediaType::Image
        } else if essence.starts_with("audio/") {
            MediaType::Audio
        } else {
            MediaType::Other
        }
    }
}

/// File extension conventionally used for a MIME type.
///
/// ```
/// use bedtime_storage::extension_for;
///
/// assert_eq!(extension_for("image/png"), "png");
/// assert_eq!(extension_for("audio/wav"), "wav");
/// assert_eq!(extension_for("application/x-unknown"), "bin");
/// ```
pub fn extension_for(mime: &str) -> &'static str {
    let essence = mime
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/l16" | "audio/pcm" => "pcm",
        "audio/ogg" => "ogg",
        _ => "bin",
    }
}
