//! Error types for the Bedtime story pipeline.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Collaborator layers (storage, generation, configuration) raise their own
//! error structs. Pipeline steps classify those into a [`StepError`], whose
//! [`FailureKind`] is what callers of the pipeline see.
//!
//! # Examples
//!
//! ```
//! use bedtime_error::{BedtimeResult, StorageError, StorageErrorKind};
//!
//! fn load() -> BedtimeResult<Vec<u8>> {
//!     Err(StorageError::new(StorageErrorKind::NotFound("user_image".to_string())))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod json;
mod step;
mod storage;

pub use config::{ConfigError, ConfigErrorKind};
pub use error::{BedtimeError, BedtimeErrorKind, BedtimeResult};
pub use generation::{GenerationError, GenerationErrorKind, RetryableError};
pub use json::{JsonError, JsonErrorKind};
pub use step::{FailureKind, StepError, StepErrorKind};
pub use storage::{StorageError, StorageErrorKind};
