//! Enumerates image files under the input root.
//!
//! The walk covers entries directly under the root plus exactly one level of
//! subdirectory, nothing deeper. Extension matching is an exact,
//! case-sensitive suffix check, so `photo.PNG` is not collected.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

/// Recognized image file suffixes
const IMAGE_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg"];

/// Exact suffix match against the recognized image extensions.
fn is_image_name(name: &str) -> bool {
    IMAGE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Collect image files under `input_root` as paths relative to it
/// (`a.png`, `Landscape/b.jpg`), sorted by name for a deterministic order.
///
/// Runs once per run, before provisioning or processing; callers treat the
/// result as immutable for the remainder of the run.
pub fn scan_input(input_root: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(input_root)
        .min_depth(1)
        .max_depth(2)
        .sort_by_file_name()
    {
        let entry =
            entry.with_context(|| format!("Failed to read an entry under {}", input_root))?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            tracing::warn!("Skipping non-UTF-8 file name under {}", input_root);
            continue;
        };
        if !is_image_name(name) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(input_root.as_std_path())
            .context("Walked entry is outside the input root")?;
        let Ok(relative) = Utf8PathBuf::from_path_buf(relative.to_path_buf()) else {
            tracing::warn!("Skipping non-UTF-8 path under {}", input_root);
            continue;
        };

        files.push(relative);
    }

    tracing::info!("Discovered {} image file(s) under {}", files.len(), input_root);
    Ok(files)
}
