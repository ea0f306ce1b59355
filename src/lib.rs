// pva - Pixelate via Aseprite
//
// This is the library crate containing the core business logic and data structures.
// The binary crate (main.rs) provides the command-line entry point.

pub mod config;
pub mod logging;
pub mod models;
pub mod prompt;
pub mod services;
pub mod workflow;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use models::{RunContext, Settings};
pub use workflow::{RunError, RunSummary};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
