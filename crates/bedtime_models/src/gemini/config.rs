//! Gemini client configuration.

use serde::{Deserialize, Serialize};

/// Public Gemini REST endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable consulted when no API key is configured.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Settings for [`GeminiClient`](crate::GeminiClient).
///
/// # Examples
///
/// ```
/// use bedtime_models::GeminiConfig;
///
/// let config: GeminiConfig = toml::from_str("max_retries = 3").unwrap();
/// assert_eq!(config.max_retries, 3);
/// assert_eq!(config.default_model, "gemini-2.5-flash");
/// assert!(config.api_key.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// REST base URL, without a trailing `/models`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key; falls back to `GEMINI_API_KEY`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Model used when a request does not name one
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Retries after the first attempt for transient failures (0 disables)
    #[serde(default)]
    pub max_retries: usize,
    /// Override for the initial backoff; otherwise chosen per error
    #[serde(default)]
    pub retry_backoff_ms: Option<u64>,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            default_model: default_model(),
            max_retries: 0,
            retry_backoff_ms: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}
