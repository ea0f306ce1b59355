//! Services module - Pure business logic for the pixelation pipeline.
//!
//! Everything here is **terminal-agnostic** and has no dependency on the CLI
//! layer, making it testable with plain temp directories.
//!
//! # Components
//!
//! - [`locator`]: finds the Aseprite executable in well-known install
//!   locations, per OS.
//! - [`scanner`]: enumerates image files under the input root (direct
//!   entries plus one level of subdirectory).
//! - [`provision`]: idempotently builds the output directory tree: root,
//!   one directory per downscale factor, and a mirror of every input
//!   subdirectory under each factor.
//! - [`PixelateService`]: stages a source file into the scratch tree,
//!   executes one Aseprite batch invocation with captured output, and
//!   relocates the processed file into its output slot. One invocation runs
//!   at a time; the workflow awaits each job before starting the next.
//!
//! # Aseprite Integration
//!
//! The service integrates with Aseprite by running it with `-b` (batch
//! mode), passing `file=` and `factor=` to the processing script via
//! `-script-param`, selecting the script with `-script`, and repeating the
//! staged file as the positional target. The script mutates the target in
//! place and reports failures only through its exit status and stderr.

pub mod locator;
pub mod pixelate;
pub mod provision;
pub mod scanner;

pub use pixelate::{JobOutcome, JobStatus, PixelateService};
