//! Trait definitions for generation backends.

use async_trait::async_trait;
use bedtime_core::{GenerateRequest, GenerateResponse, Modality};
use bedtime_error::BedtimeResult;
use std::sync::Arc;

/// Core trait that all generation backends must implement.
///
/// A single call covers every [`Modality`]; the request says which one is
/// wanted and the driver maps it to its provider's API.
#[async_trait]
pub trait GenerationDriver: Send + Sync {
    /// Generate model output for a request.
    async fn generate(&self, req: &GenerateRequest) -> BedtimeResult<GenerateResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier used when the request does not name one.
    fn model_name(&self) -> &str;

    /// Whether this backend can serve the given modality.
    fn supports(&self, modality: Modality) -> bool {
        let _ = modality;
        true
    }
}

#[async_trait]
impl<D: GenerationDriver + ?Sized> GenerationDriver for Arc<D> {
    async fn generate(&self, req: &GenerateRequest) -> BedtimeResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn supports(&self, modality: Modality) -> bool {
        (**self).supports(modality)
    }
}
