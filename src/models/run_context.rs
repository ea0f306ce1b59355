use camino::{Utf8Path, Utf8PathBuf};

/// Everything a run needs, resolved once at startup.
///
/// Built after configuration resolution and file enumeration, then passed by
/// reference to provisioning and the job loop. Nothing mutates it; the file
/// list and factor order are fixed for the remainder of the run.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Absolute input root being processed
    pub input_dir: Utf8PathBuf,

    /// Absolute output root receiving `<factor>/<relative_path>` results
    pub output_dir: Utf8PathBuf,

    /// Resolved Aseprite executable
    pub aseprite_path: Utf8PathBuf,

    /// Lua processing script, colocated with the program binary
    pub script_path: Utf8PathBuf,

    /// Ordered downscale factor tokens, e.g. `["x32", "x16"]`
    pub factors: Vec<String>,

    /// Ordered image paths relative to `input_dir`, depth at most one
    /// subdirectory (`a.png`, `Landscape/b.jpg`)
    pub files: Vec<Utf8PathBuf>,
}

impl RunContext {
    /// Total number of (file, factor) jobs this run will execute.
    pub fn job_count(&self) -> usize {
        self.files.len() * self.factors.len()
    }

    /// Output slot for a processed file: `output_dir/<factor>/<relative>`.
    pub fn output_slot(&self, factor: &str, relative: &Utf8Path) -> Utf8PathBuf {
        self.output_dir.join(factor).join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> RunContext {
        RunContext {
            input_dir: Utf8PathBuf::from("/in"),
            output_dir: Utf8PathBuf::from("/out"),
            aseprite_path: Utf8PathBuf::from("/usr/bin/aseprite"),
            script_path: Utf8PathBuf::from("/opt/pva/pva-process.lua"),
            factors: vec!["x32".to_string(), "x16".to_string()],
            files: vec![
                Utf8PathBuf::from("a.png"),
                Utf8PathBuf::from("Landscape/b.jpg"),
                Utf8PathBuf::from("c.jpeg"),
            ],
        }
    }

    #[test]
    fn test_job_count() {
        assert_eq!(context().job_count(), 6);
    }

    #[test]
    fn test_job_count_no_files() {
        let mut ctx = context();
        ctx.files.clear();
        assert_eq!(ctx.job_count(), 0);
    }

    #[test]
    fn test_output_slot_mirrors_subdirectory() {
        let ctx = context();
        assert_eq!(
            ctx.output_slot("x16", Utf8Path::new("Landscape/b.jpg")),
            Utf8PathBuf::from("/out/x16/Landscape/b.jpg")
        );
    }
}
