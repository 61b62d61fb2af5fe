//! Trait definitions for the Bedtime story pipeline.
//!
//! Pipeline steps talk to generation providers only through
//! [`GenerationDriver`], which keeps the steps testable against scripted
//! drivers and lets one provider serve every modality.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::GenerationDriver;
