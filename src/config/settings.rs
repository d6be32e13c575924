//! TOML-based configuration for datarepo.
//!
//! Supports a config file (datarepo.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [catalog]
//! datasets_dir = "${DATAREPO_HOME}/datasets"
//! cloud_platform = "azure"
//!
//! [validation]
//! max_description_length = 2048
//! max_name_length = 511
//! require_row_ids = true
//!
//! [render]
//! include = ["SOURCES", "TABLES", "RELATIONSHIPS", "PROFILE"]
//!
//! [logging]
//! filter = "datarepo=debug"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::CloudPlatform;
use crate::render::{Include, IncludeError};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<IncludeError> for SettingsError {
    fn from(err: IncludeError) -> Self {
        SettingsError::InvalidConfig(err.to_string())
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub validation: ValidationSettings,
    pub render: RenderSettings,
    pub logging: LoggingSettings,
}

/// Where dataset definitions come from.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Directory of `*.json` dataset definitions (supports ${ENV_VAR} expansion).
    pub datasets_dir: Option<String>,

    /// Platform whose type conversion rules apply to relationship columns.
    pub cloud_platform: CloudPlatform,
}

impl CatalogSettings {
    /// The datasets directory with environment variables expanded.
    pub fn resolved_datasets_dir(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.datasets_dir
            .as_deref()
            .map(|dir| expand_env_vars(dir).map(PathBuf::from))
            .transpose()
    }
}

/// Limits applied by the snapshot request validator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Descriptions must be strictly shorter than this.
    pub max_description_length: usize,

    /// Longest accepted snapshot name.
    pub max_name_length: usize,

    /// Reject row selections that name a table without row ids.
    pub require_row_ids: bool,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            max_description_length: 2048,
            max_name_length: 511,
            require_row_ids: true,
        }
    }
}

/// Output rendering defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Sections rendered when the caller does not choose.
    pub include: Vec<String>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            include: Include::DEFAULT.iter().map(|i| i.to_string()).collect(),
        }
    }
}

impl RenderSettings {
    pub fn include_flags(&self) -> Result<Vec<Include>, SettingsError> {
        Ok(Include::parse_list(self.include.iter().map(String::as_str))?)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive. `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.check()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `DATAREPO_CONFIG`
    /// 2. `./datarepo.toml`
    /// 3. `~/.config/datarepo/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("DATAREPO_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("datarepo.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("datarepo").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    fn check(&self) -> Result<(), SettingsError> {
        if self.validation.max_description_length == 0 {
            return Err(SettingsError::InvalidConfig(
                "validation.max_description_length must be positive".to_string(),
            ));
        }
        if self.validation.max_name_length == 0 {
            return Err(SettingsError::InvalidConfig(
                "validation.max_name_length must be positive".to_string(),
            ));
        }
        self.render.include_flags()?;
        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A lone `$` is kept.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                result.push('$');
                continue;
            }
        }

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
