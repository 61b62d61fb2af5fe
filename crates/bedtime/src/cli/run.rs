//! Story run and config commands.

use super::OutputFormat;
use bedtime::{BedtimeConfig, BedtimeResult, InputImage, PipelineOutcome, build_pipeline};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// Run the pipeline once and print the outcome.
///
/// Ctrl-C cancels the run. Returns whether the run succeeded.
#[instrument(skip(config), fields(has_image = image.is_some()))]
pub async fn run_story(
    config: &BedtimeConfig,
    prompt: &str,
    image: Option<&Path>,
    output: OutputFormat,
) -> Result<bool, Box<dyn std::error::Error>> {
    let pipeline = build_pipeline(config)?;

    let image = match image {
        Some(path) => {
            let data = tokio::fs::read(path).await.map_err(|e| {
                format!("Failed to read image {}: {}", path.display(), e)
            })?;
            Some(InputImage::new(data))
        }
        None => None,
    };

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling run");
            trigger.cancel();
        }
    });

    let outcome = pipeline.run_with_cancellation(prompt, image, cancel).await;
    ctrl_c.abort();

    info!(run_id = %outcome.run_id, status = %outcome.status, "Run finished");
    print_outcome(&outcome, output)?;
    Ok(outcome.is_success())
}

fn print_outcome(
    outcome: &PipelineOutcome,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(outcome)?),
        OutputFormat::Text => {
            println!("Run {}: {}", outcome.run_id, outcome.status);
            if let Some(outputs) = &outcome.outputs {
                println!("\nCharacter: {}", outputs.character_description);
                println!("\n{}\n", outputs.full_narrative);
                for scene in &outputs.illustrated_scenes {
                    println!("Scene {}: {}", scene.index + 1, scene.artifact.uri);
                }
                println!("Audiobook: {}", outputs.audiobook_uri);
            }
            if let Some(error) = &outcome.error {
                println!("Failed in {} ({}): {}", error.step, error.kind, error.message);
            }
        }
    }
    Ok(())
}

/// Print the merged configuration.
pub fn print_config(config: &BedtimeConfig) -> BedtimeResult<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
