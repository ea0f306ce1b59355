//! Run orchestration: configuration resolution, enumeration, provisioning,
//! and the sequential job loop.
//!
//! # Execution Flow
//!
//! 1. Input directory from the CLI argument, else an interactive prompt;
//!    must exist and contain at least one entry
//! 2. Settings loaded (created with defaults on first run), then resolved
//!    via auto-detection and prompts
//! 3. Resolved editor path validated before anything is written back;
//!    a fatal validation failure never rewrites the settings file
//! 4. Factor tokens validated against the supported set
//! 5. Settings rewritten only if a resolved value differs from storage
//! 6. Welcome banner, then a confirmation pause
//! 7. Image files enumerated once; output tree provisioned
//! 8. One Aseprite invocation per (file, factor) pair, strictly
//!    sequential, staged through a scratch directory that is removed when
//!    the processing scope exits
//!
//! Subprocess failures are reported and skipped over; only input,
//! configuration, and editor problems abort the run.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::config::{self, ConfigError, ConfigManager};
use crate::models::RunContext;
use crate::prompt::PromptProvider;
use crate::services::pixelate::{JobOutcome, JobStatus, PixelateService};
use crate::services::{provision, scanner};

/// Lua processing script, shipped next to the program binary
const PROCESSING_SCRIPT: &str = "pva-process.lua";

/// Terminal failures of a run.
///
/// Subprocess failures are deliberately absent: a job that goes wrong is
/// printed and skipped, never raised.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Directory not found - {0}")]
    InputNotFound(Utf8PathBuf),

    #[error("Directory is empty - {0}")]
    InputEmpty(Utf8PathBuf),

    #[error("Aseprite not found. Please edit the config file.")]
    EditorNotFound,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Job counts for the log; the user-facing result is the captured editor
/// output plus the elapsed total printed by the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Execute a full run over the given input directory.
///
/// `input_arg` is the optional CLI positional; when absent the user is
/// prompted. All terminal interaction goes through `prompt`.
pub async fn run(
    input_arg: Option<String>,
    prompt: &dyn PromptProvider,
) -> Result<RunSummary, RunError> {
    // Input directory: argument, else interactive prompt
    let raw_input = match input_arg {
        Some(arg) => arg,
        None => {
            println!("Usage: pva [input_directory]");
            prompt.ask("Input directory").map_err(RunError::Other)?
        }
    };
    let input_dir = config::absolutize(&raw_input)?;

    if !input_dir.is_dir() {
        return Err(RunError::InputNotFound(input_dir));
    }
    if dir_is_empty(&input_dir)? {
        return Err(RunError::InputEmpty(input_dir));
    }

    // Settings: load (creating defaults on first run), then resolve
    let manager = ConfigManager::new(&input_dir);
    let stored = manager.load_or_init()?;
    let resolved = manager.resolve(&stored, prompt)?;

    // The editor and the factor list must both validate before the settings
    // file is rewritten; a fatal failure leaves it exactly as the user wrote it
    let aseprite_path = Utf8PathBuf::from(&resolved.aseprite_path);
    if !aseprite_path.is_file() {
        return Err(RunError::EditorNotFound);
    }
    let factors = manager.parse_factors(&resolved)?;

    if manager.save_if_changed(&resolved, &stored)? {
        tracing::info!("Updated settings at {}", manager.settings_path());
    }

    let output_dir = Utf8PathBuf::from(&resolved.output_directory);
    let script_path = processing_script_path()?;

    // Configuration complete, welcome message
    println!("Pixelate-via-Aseprite");
    println!("By Vordy");
    println!();
    println!("Aseprite path: {aseprite_path}");
    println!("Input directory: {input_dir}");
    println!("Output directory: {output_dir}");
    println!("Downscale factors: {}", factors.join(", "));
    println!();
    prompt
        .pause("Press enter to continue...")
        .map_err(RunError::Other)?;

    // Enumerate once; the list is immutable for the rest of the run
    let files = scanner::scan_input(&input_dir)?;

    let context = RunContext {
        input_dir,
        output_dir,
        aseprite_path,
        script_path,
        factors,
        files,
    };

    let subdirs = provision::input_subdirs(&context.input_dir)?;
    provision::provision_output_tree(&context.output_dir, &context.factors, &subdirs)?;

    Ok(process_all(&context).await?)
}

/// Stage, invoke, and relocate every (file, factor) pair in order.
///
/// The scratch directory is owned by this scope; `TempDir` removes it
/// recursively on any exit path, including an early error return.
async fn process_all(context: &RunContext) -> Result<RunSummary> {
    let scratch = tempfile::tempdir().context("Failed to create scratch directory")?;
    let scratch_root = Utf8Path::from_path(scratch.path())
        .ok_or_else(|| anyhow!("Scratch directory path is not UTF-8"))?
        .to_path_buf();
    tracing::info!("Scratch directory at {}", scratch_root);

    let service = PixelateService::new(
        context.aseprite_path.clone(),
        context.script_path.clone(),
    );
    let mut summary = RunSummary::default();

    for file in &context.files {
        println!("Pixelating {file}... ");

        for factor in &context.factors {
            println!("\tFactor: {factor}... ");

            match process_job(&service, context, &scratch_root, file, factor).await {
                Ok(outcome) => {
                    print_captured(&outcome);
                    match outcome.status {
                        JobStatus::Processed => summary.processed += 1,
                        JobStatus::Failed => summary.failed += 1,
                    }
                }
                Err(e) => {
                    // Staging or relocation trouble counts like any other
                    // failed job; the run moves on to the next factor
                    tracing::error!("{} ({}) failed: {:#}", file, factor, e);
                    eprintln!("Error: {e:#}");
                    summary.failed += 1;
                }
            }
        }
    }

    tracing::info!(
        "Run complete: {} processed, {} failed out of {} job(s)",
        summary.processed,
        summary.failed,
        context.job_count()
    );
    Ok(summary)
}

/// One (file, factor) job: stage into scratch, run the editor, move the
/// result into its output slot.
///
/// Relocation happens whenever the staged file still exists, also for
/// failed jobs, so the user can inspect what the editor left behind.
async fn process_job(
    service: &PixelateService,
    context: &RunContext,
    scratch_root: &Utf8Path,
    relative: &Utf8Path,
    factor: &str,
) -> Result<JobOutcome> {
    let staged = service.stage_file(&context.input_dir, scratch_root, relative)?;
    let outcome = service.execute(&staged, factor).await?;

    if staged.is_file() {
        service.relocate(&staged, &context.output_slot(factor, relative))?;
    }

    Ok(outcome)
}

/// Print captured editor output under labeled headers, skipping empty
/// streams.
fn print_captured(outcome: &JobOutcome) {
    if !outcome.stdout.is_empty() {
        println!("--- aseprite stdout ---");
        println!("{}", outcome.stdout.trim_end());
    }
    if !outcome.stderr.is_empty() {
        println!("--- aseprite stderr ---");
        println!("{}", outcome.stderr.trim_end());
    }
}

/// The processing script ships next to the program binary.
fn processing_script_path() -> Result<Utf8PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    let dir = exe
        .parent()
        .context("Executable has no parent directory")?
        .to_path_buf();
    let dir = Utf8PathBuf::from_path_buf(dir)
        .map_err(|p| anyhow!("Executable directory is not UTF-8: {}", p.display()))?;
    Ok(dir.join(PROCESSING_SCRIPT))
}

fn dir_is_empty(dir: &Utf8Path) -> Result<bool> {
    let mut entries = dir
        .read_dir_utf8()
        .with_context(|| format!("Failed to read directory: {}", dir))?;
    Ok(entries.next().is_none())
}
