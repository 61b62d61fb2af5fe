//! Output types from generation responses.

use serde::{Deserialize, Serialize};

/// Supported output types from a generation provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Output {
    /// Plain text output.
    Text(String),

    /// Generated image output.
    Image {
        /// MIME type of the image
        mime: String,
        /// Binary image data
        data: Vec<u8>,
    },

    /// Synthesized audio output.
    Audio {
        /// MIME type of the audio
        mime: String,
        /// Binary audio data
        data: Vec<u8>,
    },
}
