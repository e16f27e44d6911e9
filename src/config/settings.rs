//! TOML-based configuration.
//!
//! Supports a config file (canteiro.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! catalog_path = "${CANTEIRO_HOME}/catalog.toml"
//!
//! [engine]
//! row_limit = 1000
//! default_date_column = "created_at"
//! row_id_column = "id"
//! merge_strategy = "union"
//!
//! [format]
//! currency_symbol = "R$"
//! decimal_separator = ","
//! thousands_separator = "."
//! date_format = "%d/%m/%Y"
//! true_label = "Sim"
//! false_label = "Não"
//! placeholder = "-"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::MergeStrategy;

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

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Field catalog file (supports ${ENV_VAR} expansion).
    pub catalog_path: Option<String>,

    /// Report engine configuration.
    pub engine: EngineSettings,

    /// Cell formatting configuration.
    pub format: FormatSettings,
}

/// Report engine configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Maximum rows fetched per table. Extra rows are silently dropped.
    pub row_limit: usize,

    /// Date column for tables that declare none.
    pub default_date_column: String,

    /// Column holding the row identifier; always projected.
    pub row_id_column: String,

    /// How per-table results are combined.
    pub merge_strategy: MergeStrategy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            row_limit: 1000,
            default_date_column: "created_at".to_string(),
            row_id_column: "id".to_string(),
            merge_strategy: MergeStrategy::Union,
        }
    }
}

/// Locale-dependent formatting of report cells.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FormatSettings {
    pub currency_symbol: String,
    pub currency_decimals: usize,
    pub decimal_separator: String,
    pub thousands_separator: String,
    /// Maximum fraction digits for plain numbers.
    pub number_max_decimals: usize,
    /// chrono format string for dates.
    pub date_format: String,
    pub true_label: String,
    pub false_label: String,
    /// Rendered for missing values.
    pub placeholder: String,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "R$".to_string(),
            currency_decimals: 2,
            decimal_separator: ",".to_string(),
            thousands_separator: ".".to_string(),
            number_max_decimals: 3,
            date_format: "%d/%m/%Y".to_string(),
            true_label: "Sim".to_string(),
            false_label: "Não".to_string(),
            placeholder: "-".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML source.
    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `CANTEIRO_CONFIG`
    /// 2. `./canteiro.toml`
    /// 3. `~/.config/canteiro/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("CANTEIRO_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("canteiro.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("canteiro").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.engine.row_limit == 0 {
            return Err(SettingsError::InvalidConfig(
                "engine.row_limit must be greater than zero".to_string(),
            ));
        }
        if self.engine.row_id_column.trim().is_empty() {
            return Err(SettingsError::InvalidConfig(
                "engine.row_id_column must not be empty".to_string(),
            ));
        }
        if self.engine.default_date_column.trim().is_empty() {
            return Err(SettingsError::InvalidConfig(
                "engine.default_date_column must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The catalog path with environment variables expanded.
    pub fn resolved_catalog_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.catalog_path
            .as_deref()
            .map(|p| expand_env_vars(p).map(PathBuf::from))
            .transpose()
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.next_if_eq(&'{').is_some() {
            let name: String = std::iter::from_fn(|| chars.next_if(|ch| *ch != '}')).collect();
            chars.next(); // closing brace
            name
        } else {
            std::iter::from_fn(|| chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_')).collect()
        };

        if var_name.is_empty() {
            // Just a lone $, keep it
            result.push('$');
            continue;
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
