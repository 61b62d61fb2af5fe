//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Bedtime - turn a photo and a prompt into an illustrated, narrated bedtime story
#[derive(Parser, Debug)]
#[command(name = "bedtime")]
#[command(about = "Turn a photo and a prompt into an illustrated, narrated bedtime story", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file layered over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one story
    Run {
        /// What the story should be about
        #[arg(long, default_value = "")]
        prompt: String,

        /// Photo the main character is based on
        #[arg(long)]
        image: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text")]
        output: OutputFormat,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary
    Text,
    /// The full outcome as JSON
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_with_globals_after_subcommand() {
        let cli = Cli::try_parse_from([
            "bedtime", "run", "--prompt", "dragons", "--image", "kid.png", "--output", "json",
            "--verbose", "--config", "my.toml",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("my.toml")));
        match cli.command {
            Commands::Run {
                prompt,
                image,
                output,
            } => {
                assert_eq!(prompt, "dragons");
                assert_eq!(image, Some(PathBuf::from("kid.png")));
                assert_eq!(output, OutputFormat::Json);
            }
            Commands::Config => panic!("expected run"),
        }
    }
}
