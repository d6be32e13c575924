//! Configuration module for datarepo.
//!
//! Handles the settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, CatalogSettings, LoggingSettings, RenderSettings, Settings, SettingsError,
    ValidationSettings,
};
