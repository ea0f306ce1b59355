//! Locates the Aseprite executable in well-known install locations.
//!
//! Checks an ordered, OS-specific list of candidate paths (retail installs,
//! Steam library folders, standard binary directories) and takes the first
//! one that exists as a regular file. No attempt is made to verify that the
//! file is actually a runnable Aseprite build; a configured path or a later
//! validation step covers that.

use camino::Utf8PathBuf;

/// Ordered candidate install paths for the current OS.
///
/// Returns an empty list on an OS without known install locations, which
/// makes the search come up empty rather than fail.
fn candidate_paths() -> Vec<Utf8PathBuf> {
    if cfg!(target_os = "windows") {
        vec![
            Utf8PathBuf::from(r"C:\Program Files\Aseprite\Aseprite.exe"),
            Utf8PathBuf::from(r"C:\Program Files (x86)\Aseprite\Aseprite.exe"),
            Utf8PathBuf::from(r"C:\Program Files\Steam\steamapps\common\Aseprite\Aseprite.exe"),
            Utf8PathBuf::from(
                r"C:\Program Files (x86)\Steam\steamapps\common\Aseprite\Aseprite.exe",
            ),
        ]
    } else if cfg!(unix) {
        let mut candidates = vec![Utf8PathBuf::from(
            "/Applications/Aseprite.app/Contents/MacOS/aseprite",
        )];

        if let Some(home) = dirs::home_dir().and_then(|h| Utf8PathBuf::from_path_buf(h).ok()) {
            candidates.push(home.join(
                "Library/Application Support/Steam/steamapps/common/Aseprite/Aseprite.app/Contents/MacOS/aseprite",
            ));
            candidates.push(home.join(".steam/debian-installation/steamapps/common/Aseprite/aseprite"));
        }

        candidates.push(Utf8PathBuf::from("/usr/local/bin/aseprite"));
        candidates.push(Utf8PathBuf::from("/usr/bin/aseprite"));
        candidates
    } else {
        Vec::new()
    }
}

/// Return the first candidate that exists as a regular file.
fn first_existing(candidates: &[Utf8PathBuf]) -> Option<Utf8PathBuf> {
    candidates.iter().find(|path| path.is_file()).cloned()
}

/// Search the well-known install locations for an Aseprite executable.
///
/// Announces a match on stdout so the user can see which install was picked
/// up before it lands in the settings file.
pub fn find_aseprite() -> Option<Utf8PathBuf> {
    let found = first_existing(&candidate_paths());

    match &found {
        Some(path) => {
            println!("Aseprite found at {path}");
            tracing::info!("Aseprite located at {}", path);
        }
        None => {
            tracing::debug!("Aseprite not found in any well-known install location");
        }
    }

    found
}
