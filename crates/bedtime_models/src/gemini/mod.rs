//! Google Gemini integration.
//!
//! Talks to the `generateContent` REST endpoint directly. Text, vision,
//! image and speech requests all go through the same call; the request's
//! [`Modality`](bedtime_core::Modality) selects the response modalities.

mod client;
mod config;
mod conversion;
mod dto;
mod wav;

pub use client::GeminiClient;
pub use config::{DEFAULT_GEMINI_BASE_URL, GEMINI_API_KEY_ENV, GeminiConfig};
pub use conversion::{from_gemini_response, to_gemini_request};
pub use dto::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, Part, PromptFeedback,
};
pub use wav::wrap_pcm;
