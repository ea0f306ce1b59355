//! Data models for pva.
//!
//! - [`Settings`]: the per-input-directory configuration persisted as
//!   `pixelate-via-aseprite.yaml`
//! - [`RunContext`]: everything a run needs, resolved once at startup
//!
//! # Architecture Note
//!
//! `Settings` derives `Serialize`/`Deserialize` for YAML persistence and
//! `PartialEq` so the config store can tell whether a resolved value differs
//! from what is on disk. `RunContext` is deliberately immutable: it is built
//! once after configuration resolution and passed by reference to every
//! component, so there is no shared mutable run state anywhere.

pub mod run_context;
pub mod settings;

pub use run_context::RunContext;
pub use settings::Settings;
