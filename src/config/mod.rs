//! Configuration module.
//!
//! Handles the settings file, environment variable expansion and defaults.

mod settings;

pub use settings::{expand_env_vars, EngineSettings, FormatSettings, Settings, SettingsError};
