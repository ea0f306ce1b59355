use serde::{Deserialize, Serialize};

/// Per-input-directory settings, stored as `pixelate-via-aseprite.yaml`
/// inside the directory being processed.
///
/// All three fields may be empty strings on disk; resolution fills them in
/// from auto-detection or interactive prompts before any file is touched.
/// `downscale_factors` stays a comma-joined string in storage, matching the
/// format the original tool wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub aseprite_path: String,

    #[serde(default)]
    pub output_directory: String,

    #[serde(default = "default_downscale_factors")]
    pub downscale_factors: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            aseprite_path: String::new(),
            output_directory: String::new(),
            downscale_factors: default_downscale_factors(),
        }
    }
}

fn default_downscale_factors() -> String {
    "x32,x16".to_string()
}
