//! pva - Pixelate via Aseprite
//!
//! Main entry point for the command-line tool.
//!
//! # Overview
//!
//! This binary crate wires the pieces together. It initializes:
//! - Logging infrastructure (daily-rotating file logs under `logs/`)
//! - Tokio runtime (subprocess execution is awaited, one job at a time)
//! - The interactive terminal prompt provider
//!
//! and then hands control to [`workflow::run`]. Terminal failures map to one
//! user-facing line each; a completed run ends with the elapsed total.
//!
//! # Configuration File
//!
//! Expected (and created on first run) in the input directory itself:
//! `pixelate-via-aseprite.yaml` with the Aseprite path, the output
//! directory, and the comma-joined downscale factor list.

use clap::Parser;
use pva::prompt::TerminalPrompt;
use pva::{APP_NAME, VERSION, workflow};
use std::time::{Duration, Instant};

/// Pixelate a directory of images through Aseprite's batch mode
#[derive(Parser, Debug)]
#[command(name = "pva", version, about)]
struct Cli {
    /// Directory of images to pixelate (prompted for interactively when omitted)
    input_directory: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = pva::logging::setup_logging("logs", "pva")?;
    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let start = Instant::now();
    let prompt = TerminalPrompt;

    match workflow::run(cli.input_directory, &prompt).await {
        Ok(summary) => {
            tracing::info!(
                "Run finished: {} processed, {} failed",
                summary.processed,
                summary.failed
            );
            println!("{}", format_elapsed(start.elapsed()));
            Ok(())
        }
        Err(err) => {
            tracing::error!("Run aborted: {err}");
            println!("{err}");
            std::process::exit(1);
        }
    }
}

/// Elapsed total in the `hours, minutes, seconds` form the tool has always
/// printed.
fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!(
        "Time elapsed: {} hours, {} minutes, {} seconds",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
