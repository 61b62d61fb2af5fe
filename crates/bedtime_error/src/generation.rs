//! Generation-provider error types and retry classification.

/// Error conditions raised by a generation provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// API key not found in configuration or environment
    #[display("GEMINI_API_KEY is not set and no api_key was configured")]
    MissingApiKey,
    /// Failed to create the HTTP client
    #[display("Failed to create generation client: {}", _0)]
    ClientCreation(String),
    /// Request could not be sent or the response body could not be read
    #[display("Generation request failed: {}", _0)]
    ApiRequest(String),
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    HttpError {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// The provider blocked the prompt or the candidate
    #[display("Generation blocked: {}", _0)]
    Blocked(String),
    /// The response contained no output of the requested modality
    #[display("Response contained no {} output", _0)]
    EmptyOutput(String),
    /// The request cannot be expressed for this provider
    #[display("Unsupported request: {}", _0)]
    Unsupported(String),
    /// Base64 decoding failed
    #[display("Base64 decode error: {}", _0)]
    Base64Decode(String),
}

impl GenerationErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationErrorKind::HttpError { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            GenerationErrorKind::ApiRequest(_) => true,
            _ => false,
        }
    }

    /// Get retry strategy parameters for this error type.
    ///
    /// Returns `(initial_backoff_ms, max_delay_secs)`.
    pub fn retry_strategy_params(&self) -> (u64, u64) {
        match self {
            GenerationErrorKind::HttpError { status_code, .. } => match *status_code {
                429 => (5000, 40),
                503 => (2000, 60),
                500 | 502 | 504 => (1000, 8),
                408 => (2000, 30),
                _ => (2000, 60),
            },
            _ => (1000, 10),
        }
    }
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use bedtime_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::MissingApiKey);
/// assert!(format!("{}", err).contains("GEMINI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use bedtime_error::{GenerationError, GenerationErrorKind, RetryableError};
///
/// let err = GenerationError::new(GenerationErrorKind::HttpError {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
///
/// assert!(err.is_retryable());
/// let (backoff, max_delay) = err.retry_strategy_params();
/// assert_eq!(backoff, 2000);
/// assert_eq!(max_delay, 60);
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;

    /// Returns `(initial_backoff_ms, max_delay_secs)`.
    fn retry_strategy_params(&self) -> (u64, u64) {
        (2000, 60)
    }
}

impl RetryableError for GenerationError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_strategy_params(&self) -> (u64, u64) {
        self.kind.retry_strategy_params()
    }
}
