//! Pipeline step error types.

use serde::{Deserialize, Serialize};

/// Specific error conditions a pipeline step can report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StepErrorKind {
    /// A required run-state key is absent
    #[display("Missing input: {}", _0)]
    MissingInput(String),
    /// The generation call failed or returned unusable output
    #[display("Generation failed: {}", _0)]
    Generation(String),
    /// A structured response could not be decoded
    #[display("Could not parse model response: {}", _0)]
    Parse(String),
    /// Durable persistence failed
    #[display("Storage failed: {}", _0)]
    Storage(String),
    /// A named artifact is absent from both stores
    #[display("Artifact not found: {}", _0)]
    ArtifactNotFound(String),
    /// A run-state key was written twice
    #[display("State key '{}' was already written", _0)]
    StateConflict(String),
    /// The run was cancelled by its caller
    #[display("Run cancelled")]
    Cancelled,
}

impl StepErrorKind {
    /// The reportable tag for this error condition.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            StepErrorKind::MissingInput(_) => FailureKind::MissingInput,
            StepErrorKind::Generation(_) => FailureKind::GenerationError,
            StepErrorKind::Parse(_) => FailureKind::ParseError,
            StepErrorKind::Storage(_) => FailureKind::StorageError,
            StepErrorKind::ArtifactNotFound(_) => FailureKind::ArtifactNotFound,
            StepErrorKind::StateConflict(_) => FailureKind::StateConflict,
            StepErrorKind::Cancelled => FailureKind::Cancelled,
        }
    }

    /// The human-readable detail without the kind prefix.
    pub fn detail(&self) -> String {
        match self {
            StepErrorKind::MissingInput(m)
            | StepErrorKind::Generation(m)
            | StepErrorKind::Parse(m)
            | StepErrorKind::Storage(m)
            | StepErrorKind::ArtifactNotFound(m)
            | StepErrorKind::StateConflict(m) => m.clone(),
            StepErrorKind::Cancelled => "run cancelled".to_string(),
        }
    }
}

/// Serializable error tag reported in a failed pipeline outcome.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum FailureKind {
    /// A required input was never produced
    MissingInput,
    /// An external generation call failed
    GenerationError,
    /// A structured response could not be decoded
    ParseError,
    /// Durable persistence failed
    StorageError,
    /// A named artifact could not be loaded
    ArtifactNotFound,
    /// A state key was written twice
    StateConflict,
    /// The caller cancelled the run
    Cancelled,
}

/// Error type for pipeline steps.
///
/// # Examples
///
/// ```
/// use bedtime_error::{FailureKind, StepError, StepErrorKind};
///
/// let err = StepError::new(StepErrorKind::MissingInput("no image supplied".to_string()));
/// assert_eq!(err.failure_kind(), FailureKind::MissingInput);
/// assert!(format!("{}", err).contains("no image supplied"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Step Error: {} at line {} in {}", kind, line, file)]
pub struct StepError {
    /// The specific error condition
    pub kind: StepErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StepError {
    /// Create a new StepError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StepErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for [`StepErrorKind::failure_kind`].
    pub fn failure_kind(&self) -> FailureKind {
        self.kind.failure_kind()
    }
}
