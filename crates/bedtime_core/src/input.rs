//! Input types for generation requests.

use serde::{Deserialize, Serialize};

/// A single part of a generation request.
///
/// # Examples
///
/// ```
/// use bedtime_core::Input;
///
/// let prompt = Input::Text("Describe this character".to_string());
/// let photo = Input::Image {
///     mime: "image/png".to_string(),
///     data: vec![0x89, 0x50, 0x4E, 0x47],
/// };
/// assert!(prompt.as_text().is_some());
/// assert!(photo.as_text().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Input {
    /// Plain text input.
    Text(String),

    /// Inline image input.
    Image {
        /// MIME type, e.g., "image/png" or "image/jpeg"
        mime: String,
        /// Raw image bytes
        data: Vec<u8>,
    },
}

impl Input {
    /// The text of a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Input::Text(text) => Some(text),
            Input::Image { .. } => None,
        }
    }
}
