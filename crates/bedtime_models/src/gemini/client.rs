//! Gemini REST client implementing [`GenerationDriver`].

use super::config::{GEMINI_API_KEY_ENV, GeminiConfig};
use super::conversion::{from_gemini_response, to_gemini_request};
use super::dto::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use bedtime_core::{GenerateRequest, GenerateResponse};
use bedtime_error::{BedtimeResult, GenerationError, GenerationErrorKind, RetryableError};
use bedtime_interface::GenerationDriver;
use reqwest::Client;
use std::time::Duration;
use tokio_retry2::{Retry, RetryError, strategy::ExponentialBackoff, strategy::jitter};
use tracing::{debug, info, instrument, warn};

/// Client for Google's Gemini `generateContent` API.
///
/// One client serves every modality; the model is taken from the request or
/// falls back to the configured default.
///
/// # Examples
///
/// ```
/// use bedtime_interface::GenerationDriver;
/// use bedtime_models::{GeminiClient, GeminiConfig};
///
/// let config = GeminiConfig {
///     api_key: Some("test-key".to_string()),
///     ..Default::default()
/// };
/// let client = GeminiClient::new(&config).unwrap();
/// assert_eq!(client.provider_name(), "gemini");
/// assert_eq!(client.model_name(), "gemini-2.5-flash");
/// ```
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model_name: String,
    max_retries: usize,
    retry_backoff_ms: Option<u64>,
}

impl GeminiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` when neither the configuration nor
    /// `GEMINI_API_KEY` supplies a key, and `ClientCreation` if the HTTP client
    /// cannot be built.
    #[instrument(skip_all, fields(model = %config.default_model))]
    pub fn new(config: &GeminiConfig) -> BedtimeResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(GEMINI_API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GenerationError::new(GenerationErrorKind::MissingApiKey))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::new(GenerationErrorKind::ClientCreation(e.to_string())))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model_name: config.default_model.clone(),
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Send one request without retrying.
    async fn send_once(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let url = self.endpoint(model);
        debug!(url = %url, "Sending Gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::ApiRequest(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(text);
            return Err(GenerationError::new(GenerationErrorKind::HttpError {
                status_code: status.as_u16(),
                message,
            }));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::ApiRequest(e.to_string())))
    }

    /// Send a request, retrying transient failures with exponential backoff.
    async fn send_with_retry(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let first = self.send_once(model, body).await;
        let err = match first {
            Ok(response) => return Ok(response),
            Err(e) if self.max_retries == 0 || !e.is_retryable() => return Err(e),
            Err(e) => e,
        };

        // Backoff shape depends on the first failure
        let (mut initial_ms, max_delay_secs) = err.retry_strategy_params();
        if let Some(override_ms) = self.retry_backoff_ms {
            initial_ms = override_ms;
        }
        info!(
            error = %err,
            model,
            initial_backoff_ms = initial_ms,
            max_retries = self.max_retries,
            max_delay_secs,
            "Gemini request failed, retrying"
        );

        let strategy = ExponentialBackoff::from_millis(initial_ms)
            .factor(2)
            .max_delay(Duration::from_secs(max_delay_secs))
            .map(jitter)
            .take(self.max_retries);

        Retry::spawn(strategy, || async move {
            match self.send_once(model, body).await {
                Ok(response) => Ok(response),
                Err(e) if e.is_retryable() => {
                    warn!(error = %e, "Transient Gemini error, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => {
                    warn!(error = %e, "Permanent Gemini error, failing immediately");
                    Err(RetryError::Permanent(e))
                }
            }
        })
        .await
    }
}

#[async_trait]
impl GenerationDriver for GeminiClient {
    #[instrument(
        skip(self, req),
        fields(modality = %req.modality(), model = req.model().as_deref().unwrap_or(&self.model_name))
    )]
    async fn generate(&self, req: &GenerateRequest) -> BedtimeResult<GenerateResponse> {
        let body = to_gemini_request(req)?;
        let model = req.model().as_deref().unwrap_or(&self.model_name);

        let response = self.send_with_retry(model, &body).await?;
        let converted = from_gemini_response(response, req)?;
        debug!(outputs = converted.outputs.len(), "Gemini response converted");
        Ok(converted)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_model() {
        let config = GeminiConfig {
            api_key: Some("k".to_string()),
            base_url: "http://localhost:8080/v1beta/".to_string(),
            ..Default::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint("gemini-2.5-flash-image"),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }

    #[test]
    fn blank_configured_key_is_ignored() {
        let config = GeminiConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        // Falls through to the environment; absent there, creation fails.
        if std::env::var(GEMINI_API_KEY_ENV).is_err() {
            let err = GeminiClient::new(&config).unwrap_err();
            assert!(format!("{err}").contains("GEMINI_API_KEY"));
        }
    }
}
