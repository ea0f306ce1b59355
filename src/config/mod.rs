use crate::models::Settings;
use crate::prompt::PromptProvider;
use crate::services::locator;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::fs;
use thiserror::Error;

/// Settings file name, written into the input directory itself.
pub const SETTINGS_FILE: &str = "pixelate-via-aseprite.yaml";

/// Errors from configuration validation
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid downscale factor - {0}")]
    InvalidFactor(String),
}

/// Configuration manager for the per-input-directory settings file.
///
/// Owns the settings path and the compiled factor-token pattern. Loading
/// creates the file with defaults on first run and re-reads it from disk, so
/// the values used are always the values stored. Saving happens only when a
/// resolved field differs from what was last read.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    settings_path: Utf8PathBuf,

    /// Supported factor tokens: x32, x16, x8, x4, x2
    factor_pattern: Regex,
}

impl ConfigManager {
    /// Create a new ConfigManager for the given input directory.
    pub fn new<P: AsRef<Utf8Path>>(input_dir: P) -> Self {
        Self {
            settings_path: input_dir.as_ref().join(SETTINGS_FILE),
            factor_pattern: Regex::new(r"^x(?:32|16|8|4|2)$").expect("Invalid factor regex"),
        }
    }

    /// Get the settings file path.
    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }

    /// Load the settings file, creating it with defaults first if absent.
    ///
    /// A first run round-trips the defaults through storage rather than
    /// using them in-memory, so what this returns is always what a later
    /// run would read back.
    pub fn load_or_init(&self) -> Result<Settings> {
        if !self.settings_path.exists() {
            tracing::info!(
                "Settings file not found at {}, writing defaults",
                self.settings_path
            );
            self.save(&Settings::default())?;
        }

        let file_contents = fs::read_to_string(&self.settings_path)
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?;

        let settings: Settings = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::info!("Loaded settings from {}", self.settings_path);
        Ok(settings)
    }

    /// Save the settings file.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Rewrite the settings file only when a resolved field differs from the
    /// values last read from storage. Returns whether a write happened.
    pub fn save_if_changed(&self, resolved: &Settings, stored: &Settings) -> Result<bool> {
        if resolved == stored {
            tracing::debug!("Settings unchanged, skipping rewrite");
            return Ok(false);
        }

        self.save(resolved)?;
        Ok(true)
    }

    /// Fill in empty fields from fallbacks.
    ///
    /// The editor path falls back to the well-known-location search, then to
    /// an interactive prompt; the output directory falls back to a prompt
    /// (made absolute). Stored values always win. The factor string is
    /// carried through verbatim; [`parse_factors`](Self::parse_factors)
    /// validates it separately.
    pub fn resolve(&self, stored: &Settings, prompt: &dyn PromptProvider) -> Result<Settings> {
        let aseprite_path = if stored.aseprite_path.is_empty() {
            match locator::find_aseprite() {
                Some(path) => path.into_string(),
                None => prompt.ask("Aseprite path")?,
            }
        } else {
            stored.aseprite_path.clone()
        };

        let output_directory = if stored.output_directory.is_empty() {
            absolutize(&prompt.ask("Output directory")?)?.into_string()
        } else {
            stored.output_directory.clone()
        };

        Ok(Settings {
            aseprite_path,
            output_directory,
            downscale_factors: stored.downscale_factors.clone(),
        })
    }

    /// Split the comma-joined factor string and validate every token against
    /// the supported set. An unknown or empty token aborts the run here,
    /// before any directory is created or file staged.
    pub fn parse_factors(&self, settings: &Settings) -> Result<Vec<String>, ConfigError> {
        let mut factors = Vec::new();

        for token in settings.downscale_factors.split(',') {
            let token = token.trim();
            if !self.factor_pattern.is_match(token) {
                return Err(ConfigError::InvalidFactor(token.to_string()));
            }
            factors.push(token.to_string());
        }

        Ok(factors)
    }
}

/// Make a user-entered path absolute against the current directory.
pub fn absolutize(raw: &str) -> Result<Utf8PathBuf> {
    let path = Utf8PathBuf::from(raw.trim());
    if path.is_absolute() {
        return Ok(path);
    }

    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let cwd = Utf8PathBuf::from_path_buf(cwd)
        .map_err(|p| anyhow::anyhow!("Current directory is not UTF-8: {}", p.display()))?;
    Ok(cwd.join(path))
}
