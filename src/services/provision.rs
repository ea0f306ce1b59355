//! Builds the output directory tree before processing starts.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// List the direct subdirectories of the input root, sorted by name.
pub fn input_subdirs(input_root: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let mut subdirs = Vec::new();

    let entries = input_root
        .read_dir_utf8()
        .with_context(|| format!("Failed to read input directory: {}", input_root))?;
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read an entry under {}", input_root))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("Failed to stat {}", entry.path()))?;
        if file_type.is_dir() {
            subdirs.push(Utf8PathBuf::from(entry.file_name()));
        }
    }

    subdirs.sort();
    Ok(subdirs)
}

/// Idempotently ensure the output root, one directory per downscale factor,
/// and a mirror of every input subdirectory under each factor directory.
///
/// Purely additive: existing directories are left alone, nothing is ever
/// removed, and re-running is safe.
pub fn provision_output_tree(
    output_root: &Utf8Path,
    factors: &[String],
    subdirs: &[Utf8PathBuf],
) -> Result<()> {
    fs::create_dir_all(output_root)
        .with_context(|| format!("Failed to create output directory: {}", output_root))?;

    for factor in factors {
        let factor_dir = output_root.join(factor);
        fs::create_dir_all(&factor_dir)
            .with_context(|| format!("Failed to create factor directory: {}", factor_dir))?;

        for subdir in subdirs {
            let mirror = factor_dir.join(subdir);
            fs::create_dir_all(&mirror)
                .with_context(|| format!("Failed to mirror subdirectory: {}", mirror))?;
        }
    }

    tracing::debug!(
        "Provisioned output tree under {} ({} factor(s), {} subdirectory(ies))",
        output_root,
        factors.len(),
        subdirs.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn utf8_root(temp_dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap()
    }

    fn factors() -> Vec<String> {
        vec!["x32".to_string(), "x16".to_string()]
    }

    #[test]
    fn test_input_subdirs_lists_only_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_root(&temp_dir);

        fs::create_dir(root.join("Landscape")).unwrap();
        fs::create_dir(root.join("Portrait")).unwrap();
        File::create(root.join("a.png")).unwrap();

        let subdirs = input_subdirs(&root).unwrap();
        assert_eq!(
            subdirs,
            vec![Utf8PathBuf::from("Landscape"), Utf8PathBuf::from("Portrait")]
        );
    }

    #[test]
    fn test_provision_creates_full_tree() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_root(&temp_dir);
        let output_root = root.join("out");
        let subdirs = vec![Utf8PathBuf::from("Landscape")];

        provision_output_tree(&output_root, &factors(), &subdirs).unwrap();

        assert!(output_root.join("x32").is_dir());
        assert!(output_root.join("x16").is_dir());
        assert!(output_root.join("x32/Landscape").is_dir());
        assert!(output_root.join("x16/Landscape").is_dir());
    }

    #[test]
    fn test_provision_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_root(&temp_dir);
        let output_root = root.join("out");
        let subdirs = vec![Utf8PathBuf::from("Landscape")];

        provision_output_tree(&output_root, &factors(), &subdirs).unwrap();
        let first: Vec<_> = walkdir::WalkDir::new(output_root.as_std_path())
            .sort_by_file_name()
            .into_iter()
            .map(|e| e.unwrap().path().to_path_buf())
            .collect();

        provision_output_tree(&output_root, &factors(), &subdirs).unwrap();
        let second: Vec<_> = walkdir::WalkDir::new(output_root.as_std_path())
            .sort_by_file_name()
            .into_iter()
            .map(|e| e.unwrap().path().to_path_buf())
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_provision_leaves_existing_files_alone() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_root(&temp_dir);
        let output_root = root.join("out");

        provision_output_tree(&output_root, &factors(), &[]).unwrap();
        File::create(output_root.join("x32/keep.png")).unwrap();

        provision_output_tree(&output_root, &factors(), &[]).unwrap();
        assert!(output_root.join("x32/keep.png").is_file());
    }
}
