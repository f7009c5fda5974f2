//! Configuration loading (`config.toml`).

pub mod settings;

pub use settings::{Settings, ToolPaths};
