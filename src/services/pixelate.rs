//! Executes Aseprite batch jobs: stage, invoke, relocate.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Result of one (file, factor) job.
///
/// Both output streams are captured in full; the workflow prints them under
/// labeled headers so the user can judge success by inspection.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub status: JobStatus,
    pub duration: Duration,
    pub stdout: String,
    pub stderr: String,
}

/// Status of a single batch invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Processed,
    Failed,
}

/// Service that drives Aseprite's batch mode for staged files.
///
/// Stateless apart from the resolved executable and processing-script paths;
/// every operation takes explicit parameters. Invocations are synchronous
/// from the caller's point of view: the returned future resolves only after
/// the subprocess has exited and both streams are drained.
#[derive(Debug, Clone)]
pub struct PixelateService {
    aseprite_path: Utf8PathBuf,
    script_path: Utf8PathBuf,
}

impl PixelateService {
    /// Create a new PixelateService for a resolved executable and script.
    pub fn new(aseprite_path: Utf8PathBuf, script_path: Utf8PathBuf) -> Self {
        Self {
            aseprite_path,
            script_path,
        }
    }

    /// Copy the source file into the scratch tree at its relative path,
    /// creating any needed scratch parents first. The original under the
    /// input root is never handed to the editor.
    pub fn stage_file(
        &self,
        input_root: &Utf8Path,
        scratch_root: &Utf8Path,
        relative: &Utf8Path,
    ) -> Result<Utf8PathBuf> {
        let source = input_root.join(relative);
        let staged = scratch_root.join(relative);

        if let Some(parent) = staged.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create scratch directory: {}", parent))?;
        }

        fs::copy(&source, &staged)
            .with_context(|| format!("Failed to stage {} into the scratch directory", source))?;

        tracing::debug!("Staged {} at {}", source, staged);
        Ok(staged)
    }

    /// Argument vector for one batch invocation.
    ///
    /// Contract with the processing script: `-b` selects headless batch
    /// execution, the two `-script-param key=value` pairs are read by the
    /// script, `-script` selects the script file, and the staged path is
    /// repeated as the positional target the script mutates in place.
    pub fn build_batch_args(&self, staged: &Utf8Path, factor: &str) -> Vec<String> {
        vec![
            "-b".to_string(),
            "-script-param".to_string(),
            format!("file={staged}"),
            "-script-param".to_string(),
            format!("factor={factor}"),
            "-script".to_string(),
            self.script_path.to_string(),
            staged.to_string(),
        ]
    }

    /// Run one batch invocation to completion, capturing both output
    /// streams in full (nothing is streamed while the editor runs).
    ///
    /// A non-zero exit or any stderr text marks the job failed; the caller
    /// reports it and moves on. No timeout is imposed.
    pub async fn execute(&self, staged: &Utf8Path, factor: &str) -> Result<JobOutcome> {
        let args = self.build_batch_args(staged, factor);
        tracing::debug!("Executing: {} {}", self.aseprite_path, args.join(" "));

        let start = Instant::now();
        let output = Command::new(self.aseprite_path.as_std_path())
            .args(&args)
            .output()
            .await
            .with_context(|| format!("Failed to run Aseprite at {}", self.aseprite_path))?;
        let duration = start.elapsed();

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        let status = if output.status.success() && stderr.is_empty() {
            JobStatus::Processed
        } else {
            tracing::warn!(
                "Aseprite reported a problem for {} ({}): exit code {:?}",
                staged,
                factor,
                output.status.code()
            );
            JobStatus::Failed
        };

        tracing::info!(
            "Aseprite finished {} ({}) in {:.2}s",
            staged,
            factor,
            duration.as_secs_f32()
        );

        Ok(JobOutcome {
            status,
            duration,
            stdout,
            stderr,
        })
    }

    /// Move the processed file from the scratch tree into its output slot.
    ///
    /// The scratch directory usually lives on the system temp mount, where a
    /// plain rename across filesystems fails; fall back to copy-and-remove.
    pub fn relocate(&self, staged: &Utf8Path, dest: &Utf8Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {}", parent))?;
        }

        if fs::rename(staged, dest).is_err() {
            fs::copy(staged, dest)
                .with_context(|| format!("Failed to move {} to {}", staged, dest))?;
            fs::remove_file(staged)
                .with_context(|| format!("Failed to remove staged file: {}", staged))?;
        }

        tracing::debug!("Relocated {} to {}", staged, dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn utf8_root(temp_dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap()
    }

    fn service() -> PixelateService {
        PixelateService::new(
            Utf8PathBuf::from("/opt/aseprite/bin/aseprite"),
            Utf8PathBuf::from("/opt/pva/pva-process.lua"),
        )
    }

    #[test]
    fn test_build_batch_args() {
        let args = service().build_batch_args(Utf8Path::new("/scratch/a.png"), "x16");

        assert_eq!(
            args,
            vec![
                "-b",
                "-script-param",
                "file=/scratch/a.png",
                "-script-param",
                "factor=x16",
                "-script",
                "/opt/pva/pva-process.lua",
                "/scratch/a.png",
            ]
        );
    }

    #[test]
    fn test_build_batch_args_repeats_target_last() {
        let args = service().build_batch_args(Utf8Path::new("/scratch/Landscape/b.jpg"), "x32");
        assert_eq!(args.last().unwrap(), "/scratch/Landscape/b.jpg");
        assert!(args.contains(&"factor=x32".to_string()));
    }

    #[test]
    fn test_stage_file_creates_parents_and_copies() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_root(&temp_dir);
        let input_root = root.join("in");
        let scratch_root = root.join("scratch");

        fs::create_dir_all(input_root.join("Landscape")).unwrap();
        let mut source = File::create(input_root.join("Landscape/b.jpg")).unwrap();
        source.write_all(b"image bytes").unwrap();

        let staged = service()
            .stage_file(&input_root, &scratch_root, Utf8Path::new("Landscape/b.jpg"))
            .unwrap();

        assert_eq!(staged, scratch_root.join("Landscape/b.jpg"));
        assert_eq!(fs::read(&staged).unwrap(), b"image bytes");
        // The original stays in place
        assert!(input_root.join("Landscape/b.jpg").is_file());
    }

    #[test]
    fn test_stage_file_missing_source_fails() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_root(&temp_dir);

        let result = service().stage_file(
            &root.join("in"),
            &root.join("scratch"),
            Utf8Path::new("missing.png"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_relocate_moves_into_factor_slot() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_root(&temp_dir);
        let scratch = root.join("scratch");
        let output_root = root.join("out");

        fs::create_dir_all(&scratch).unwrap();
        File::create(scratch.join("a.png"))
            .unwrap()
            .write_all(b"pixelated")
            .unwrap();

        let dest = output_root.join("x16/a.png");
        service().relocate(&scratch.join("a.png"), &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"pixelated");
        assert!(!scratch.join("a.png").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_captures_stdout() {
        // `echo` stands in for the editor: echoes its arguments and exits 0
        let service = PixelateService::new(
            Utf8PathBuf::from("/bin/echo"),
            Utf8PathBuf::from("/opt/pva/pva-process.lua"),
        );

        let outcome = service
            .execute(Utf8Path::new("/scratch/a.png"), "x16")
            .await
            .unwrap();

        assert_eq!(outcome.status, JobStatus::Processed);
        assert!(outcome.stdout.contains("factor=x16"));
        assert!(outcome.stderr.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_nonzero_exit_is_failed() {
        let service = PixelateService::new(
            Utf8PathBuf::from("/bin/false"),
            Utf8PathBuf::from("/opt/pva/pva-process.lua"),
        );

        let outcome = service
            .execute(Utf8Path::new("/scratch/a.png"), "x16")
            .await
            .unwrap();

        assert_eq!(outcome.status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn test_execute_missing_executable_is_an_error() {
        let service = PixelateService::new(
            Utf8PathBuf::from("/nonexistent/aseprite"),
            Utf8PathBuf::from("/opt/pva/pva-process.lua"),
        );

        assert!(
            service
                .execute(Utf8Path::new("/scratch/a.png"), "x16")
                .await
                .is_err()
        );
    }
}
