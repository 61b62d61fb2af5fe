//! Generation provider integrations for the Bedtime story pipeline.
//!
//! Currently a single provider is shipped: [`GeminiClient`], which implements
//! [`GenerationDriver`](bedtime_interface::GenerationDriver) for text,
//! vision-to-text, text-to-image and text-to-speech requests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;

pub use gemini::{
    Candidate, Content, DEFAULT_GEMINI_BASE_URL, GEMINI_API_KEY_ENV, GeminiClient, GeminiConfig,
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData, Part,
    PromptFeedback, from_gemini_response, to_gemini_request, wrap_pcm,
};
