//! Command implementations for the QINCM CLI.
//!
//! Reads a JSON run configuration, builds the model from its tables,
//! evaluates the requested mode and writes the result next to the input.

use clap::Subcommand;
use std::path::PathBuf;

pub mod config;
pub mod input;
pub mod scenario;

#[derive(Subcommand)]
pub enum Command {
    /// Run a model configuration (JSON) and write the route totals
    Run {
        /// Path to the run configuration
        input: PathBuf,

        /// Output path for the route totals JSON (default: <input>_output.json)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Run { input, output } => {
            scenario::run_scenario(&input, output.as_deref())?;
            Ok(())
        }
    }
}
