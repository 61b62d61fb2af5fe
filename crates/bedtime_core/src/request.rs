//! Request and response types for generation calls.

use crate::{Input, Modality, Output, VoiceConfig};
use serde::{Deserialize, Serialize};

/// Shape the provider should give a text response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Free-form text
    #[default]
    Text,
    /// A JSON document
    Json,
}

/// Provider-neutral generation request.
///
/// # Examples
///
/// ```
/// use bedtime_core::{GenerateRequest, Input, Modality};
///
/// let request = GenerateRequest::builder()
///     .modality(Modality::Text)
///     .inputs(vec![Input::Text("Write a story".to_string())])
///     .model("gemini-2.5-flash".to_string())
///     .build()
///     .unwrap();
///
/// assert_eq!(*request.modality(), Modality::Text);
/// assert_eq!(request.model().as_deref(), Some("gemini-2.5-flash"));
/// assert_eq!(request.prompt_text(), "Write a story");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_builder::Builder,
    derive_getters::Getters,
)]
#[builder(setter(into))]
pub struct GenerateRequest {
    /// What kind of generation to perform
    modality: Modality,
    /// Ordered request parts
    #[builder(default)]
    inputs: Vec<Input>,
    /// Model override; the driver default is used when `None`
    #[builder(default)]
    model: Option<String>,
    /// Sampling temperature
    #[builder(default)]
    temperature: Option<f32>,
    /// Maximum number of output tokens
    #[builder(default)]
    max_tokens: Option<u32>,
    /// Requested shape of a text response
    #[builder(default)]
    response_format: ResponseFormat,
    /// Voice for text-to-speech requests
    #[builder(default)]
    voice: Option<VoiceConfig>,
}

impl GenerateRequest {
    /// Start building a request.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }

    /// All text parts joined by newlines.
    pub fn prompt_text(&self) -> String {
        self.inputs
            .iter()
            .filter_map(Input::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The unified response object.
///
/// # Examples
///
/// ```
/// use bedtime_core::{GenerateResponse, Output};
///
/// let response = GenerateResponse {
///     outputs: vec![
///         Output::Text("Once upon a time".to_string()),
///         Output::Text(" there was a fox.".to_string()),
///     ],
/// };
///
/// assert_eq!(response.text().as_deref(), Some("Once upon a time there was a fox."));
/// assert!(response.image().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    pub outputs: Vec<Output>,
}

impl GenerateResponse {
    /// Concatenated text outputs, or `None` if there are none.
    pub fn text(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .outputs
            .iter()
            .filter_map(|output| match output {
                Output::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.concat())
        }
    }

    /// The first image output as `(mime, bytes)`.
    pub fn image(&self) -> Option<(&str, &[u8])> {
        self.outputs.iter().find_map(|output| match output {
            Output::Image { mime, data } => Some((mime.as_str(), data.as_slice())),
            _ => None,
        })
    }

    /// The first audio output as `(mime, bytes)`.
    pub fn audio(&self) -> Option<(&str, &[u8])> {
        self.outputs.iter().find_map(|output| match output {
            Output::Audio { mime, data } => Some((mime.as_str(), data.as_slice())),
            _ => None,
        })
    }
}
