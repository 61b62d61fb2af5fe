//! Errors raised while pulling a structured payload out of model text.

/// What was wrong with a structured model response.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum JsonErrorKind {
    /// Neither a fenced block nor a brace-delimited object was present
    #[display("no JSON object in a {} byte response", _0)]
    NoPayload(usize),
    /// A payload was found but did not decode into the expected shape
    #[display("payload does not decode: {} (starts with: {})", reason, preview)]
    Malformed {
        /// Decoder message
        reason: String,
        /// First characters of the payload
        preview: String,
    },
    /// The payload decoded but a field has no usable content
    #[display("{} has no content", _0)]
    EmptyField(String),
}

/// A structured-response failure with the location that raised it.
///
/// # Examples
///
/// ```
/// use bedtime_error::{JsonError, JsonErrorKind};
///
/// let err = JsonError::new(JsonErrorKind::EmptyField("story_scenes".to_string()));
/// assert!(format!("{}", err).contains("story_scenes has no content"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Response Payload Error: {} at line {} in {}", kind, line, file)]
pub struct JsonError {
    /// What went wrong
    pub kind: JsonErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Capture `kind` at the caller's location.
    #[track_caller]
    pub fn new(kind: JsonErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
