//! Layered application configuration.
//!
//! Sources, later overriding earlier:
//! - Bundled defaults (`bedtime.toml` shipped with the crate)
//! - `~/.config/bedtime/bedtime.toml`
//! - `./bedtime.toml`
//! - An explicit file (the CLI's `--config`)
//! - `BEDTIME__<SECTION>__<KEY>` environment variables

use bedtime_core::LoggingConfig;
use bedtime_error::{BedtimeError, BedtimeResult, ConfigError, ConfigErrorKind};
use bedtime_models::GeminiConfig;
use bedtime_pipeline::PipelineConfig;
use bedtime_storage::StorageConfig;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../bedtime.toml");

/// Everything the `bedtime` binary can be configured with.
///
/// # Example
///
/// ```no_run
/// use bedtime::BedtimeConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = BedtimeConfig::load(None)?;
/// println!("Illustrating with {}", config.pipeline.image_model);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BedtimeConfig {
    /// Models, style, voice and concurrency
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Durable artifact store
    #[serde(default)]
    pub storage: StorageConfig,
    /// Gemini client
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Tracing output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BedtimeConfig {
    /// Load the bundled defaults overlaid with user files and environment.
    ///
    /// `explicit` must exist when given; the other files are optional.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or the merged result does
    /// not deserialize.
    #[instrument(skip_all, fields(explicit = ?explicit))]
    pub fn load(explicit: Option<&Path>) -> BedtimeResult<Self> {
        debug!("Loading configuration");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(config_dir) = dirs::config_dir() {
            let home_config = config_dir.join("bedtime/bedtime.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("bedtime").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("BEDTIME")
                .separator("__")
                .try_parsing(true),
        );

        Self::finish(builder)
    }

    /// Load a single TOML file on top of the bundled defaults, ignoring
    /// user files and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> BedtimeResult<Self> {
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()).required(true));
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> BedtimeResult<Self> {
        builder
            .build()
            .map_err(|e| {
                BedtimeError::from(ConfigError::new(ConfigErrorKind::Sources(e.to_string())))
            })?
            .try_deserialize()
            .map_err(|e| {
                BedtimeError::from(ConfigError::new(ConfigErrorKind::Shape(e.to_string())))
            })
    }

    /// Render as TOML. Secrets are never serialized.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> BedtimeResult<String> {
        toml::to_string_pretty(self).map_err(|e| {
            BedtimeError::from(ConfigError::new(ConfigErrorKind::Render(e.to_string())))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_parse() {
        let config: BedtimeConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.pipeline.max_concurrent_illustrations, 4);
        assert_eq!(config.pipeline.default_theme, "a fun adventure");
    }

    #[test]
    fn rendered_toml_omits_secrets() {
        let mut config = BedtimeConfig::default();
        config.gemini.api_key = Some("secret-key".to_string());
        config.storage.access_token = Some("secret-token".to_string());

        let rendered = config.to_toml().unwrap();
        assert!(!rendered.contains("secret-key"));
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("[pipeline]"));
    }
}
