// Teevi Core
//
// Host-facing contract shared by every extension:
// - extension: models and traits the host application consumes
// - config: layered configuration (defaults, file, environment)
// - logging: tracing subscriber setup

pub mod config;
pub mod extension;
pub mod logging;

pub use config::Config;
pub use extension::{ExtensionError, Result};
