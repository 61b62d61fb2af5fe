//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create storage directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write an object
    #[display("Failed to write object: {}", _0)]
    Write(String),
    /// Failed to read an object
    #[display("Failed to read object: {}", _0)]
    Read(String),
    /// Artifact not found at the specified key
    #[display("Artifact not found: {}", _0)]
    NotFound(String),
    /// Invalid storage key or path
    #[display("Invalid storage key: {}", _0)]
    InvalidKey(String),
    /// Remote store rejected the request
    #[display("Blob store returned HTTP {}: {}", status_code, message)]
    Rejected {
        /// HTTP status code
        status_code: u16,
        /// Response body or reason
        message: String,
    },
    /// Invalid storage configuration
    #[display("Invalid configuration: {}", _0)]
    InvalidConfig(String),
    /// Storage backend is unavailable
    #[display("Storage unavailable: {}", _0)]
    Unavailable(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use bedtime_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("2024-05-01/abc/scene_0.png".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// assert!(err.is_not_found());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether this error reports a missing object.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, StorageErrorKind::NotFound(_))
    }
}
