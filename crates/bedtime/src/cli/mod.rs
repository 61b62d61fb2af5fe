//! Command-line interface module.

mod commands;
mod run;

pub use commands::{Cli, Commands, OutputFormat};
pub use run::{print_config, run_story};
