//! Tracing subscriber initialization.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Logging section of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
    /// Output format
    #[serde(default)]
    pub format: LogFormat,
    /// Also export spans to stdout through OpenTelemetry (requires the `otel` feature)
    #[serde(default)]
    pub otel_stdout: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            otel_stdout: false,
        }
    }
}

impl LoggingConfig {
    /// Build the env filter: `RUST_LOG` wins, then `--verbose`, then the configured level.
    fn filter(&self, verbose: bool) -> EnvFilter {
        let fallback = if verbose { "debug" } else { self.level.as_str() };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    }
}

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Returns error if a global subscriber is already installed.
pub fn init_telemetry(
    config: &LoggingConfig,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = match config.format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_filter(config.filter(verbose))
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_filter(config.filter(verbose))
            .boxed(),
    };

    let registry = tracing_subscriber::registry().with(fmt_layer);

    #[cfg(feature = "otel")]
    if config.otel_stdout {
        use opentelemetry::trace::TracerProvider as _;
        use opentelemetry_sdk::{
            Resource,
            trace::{RandomIdGenerator, Sampler, TracerProvider},
        };

        let provider = TracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .with_id_generator(RandomIdGenerator::default())
            .with_sampler(Sampler::AlwaysOn)
            .with_resource(Resource::default())
            .build();
        let tracer = provider.tracer("bedtime");
        opentelemetry::global::set_tracer_provider(provider);

        let telemetry_layer = tracing_opentelemetry::layer()
            .with_tracer(tracer)
            .with_filter(config.filter(verbose));
        registry.with(telemetry_layer).try_init()?;
        return Ok(());
    }

    #[cfg(not(feature = "otel"))]
    if config.otel_stdout {
        tracing::warn!("otel_stdout requested but bedtime was built without the `otel` feature");
    }

    registry.try_init()?;
    Ok(())
}

/// Flush pending spans before exit.
pub fn shutdown_telemetry() {
    #[cfg(feature = "otel")]
    opentelemetry::global::shutdown_tracer_provider();
}
