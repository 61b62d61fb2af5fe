//! Errors raised while assembling layered configuration.

/// Which stage of configuration handling failed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A source file could not be read or merged
    #[display("cannot read configuration sources: {}", _0)]
    Sources(String),
    /// The merged sources do not fit the expected sections
    #[display("configuration does not match the expected sections: {}", _0)]
    Shape(String),
    /// The effective configuration could not be written out
    #[display("cannot render configuration: {}", _0)]
    Render(String),
}

/// A configuration failure with the location that raised it.
///
/// # Examples
///
/// ```
/// use bedtime_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::Shape(
///     "pipeline.max_concurrent_illustrations: invalid type".to_string(),
/// ));
/// assert!(format!("{}", err).contains("max_concurrent_illustrations"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// Which stage failed
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Capture `kind` at the caller's location.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
