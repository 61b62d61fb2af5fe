//! Core data types for the Bedtime story pipeline.
//!
//! These types describe generation requests and responses independently of
//! any provider, so pipeline steps and drivers can be developed and tested
//! separately.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod input;
mod modality;
mod output;
mod request;
mod telemetry;
mod voice;

pub use input::Input;
pub use modality::Modality;
pub use output::Output;
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse, ResponseFormat};
pub use telemetry::{LogFormat, LoggingConfig, init_telemetry, shutdown_telemetry};
pub use voice::{AudioEncoding, VoiceConfig};
