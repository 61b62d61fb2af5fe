//! Bedtime CLI binary.
//!
//! - `bedtime run`: generate one illustrated, narrated story
//! - `bedtime config`: show the effective configuration

use clap::Parser;
use std::process::ExitCode;

mod cli;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, print_config, run_story};

    // Load .env before reading any configuration
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = bedtime::BedtimeConfig::load(cli.config.as_deref())?;

    bedtime::init_telemetry(&config.logging, cli.verbose)
        .map_err(|e| format!("Failed to initialize logging: {}", e))?;

    let result = match cli.command {
        Commands::Run {
            prompt,
            image,
            output,
        } => run_story(&config, &prompt, image.as_deref(), output)
            .await
            .map(|succeeded| {
                if succeeded {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                }
            }),
        Commands::Config => print_config(&config)
            .map(|()| ExitCode::SUCCESS)
            .map_err(Into::into),
    };

    bedtime::shutdown_telemetry();
    result
}
