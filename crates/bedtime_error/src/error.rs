//! Top-level error wrapper types.

use crate::{ConfigError, GenerationError, JsonError, StepError, StorageError};

/// The union of every error the workspace can raise.
///
/// # Examples
///
/// ```
/// use bedtime_error::{BedtimeError, GenerationError, GenerationErrorKind};
///
/// let err: BedtimeError = GenerationError::new(GenerationErrorKind::MissingApiKey).into();
/// assert!(format!("{}", err).contains("Generation"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum BedtimeErrorKind {
    /// Structured model response could not be used
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Blob or artifact storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Generation provider error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Pipeline step error
    #[from(StepError)]
    Step(StepError),
}

/// Bedtime error with kind discrimination.
///
/// # Examples
///
/// ```
/// use bedtime_error::{BedtimeErrorKind, BedtimeResult, ConfigError, ConfigErrorKind};
///
/// fn might_fail() -> BedtimeResult<()> {
///     Err(ConfigError::new(ConfigErrorKind::Sources("bedtime.toml".to_string())))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), BedtimeErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Bedtime Error: {}", _0)]
pub struct BedtimeError(Box<BedtimeErrorKind>);

impl BedtimeError {
    /// Create a new error from a kind.
    pub fn new(kind: BedtimeErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BedtimeErrorKind {
        &self.0
    }

    /// Consume the wrapper and return the kind.
    pub fn into_kind(self) -> BedtimeErrorKind {
        *self.0
    }
}

// Generic From implementation for any type that converts to BedtimeErrorKind
impl<T> From<T> for BedtimeError
where
    T: Into<BedtimeErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Bedtime operations.
pub type BedtimeResult<T> = std::result::Result<T, BedtimeError>;
