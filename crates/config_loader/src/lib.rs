//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Generate `TailConfig`
//!
//! Required values (file path, endpoint, topic) may be left out of the file
//! and supplied on the command line; use [`ConfigLoader::parse_from_path`] in
//! that case and call [`ConfigLoader::validate`] after applying overrides.
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("chattail.toml")).unwrap();
//! println!("Topic: {}", config.target.topic);
//! ```

mod parser;
mod validator;

pub use contracts::TailConfig;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<TailConfig, ContractError> {
        let config = Self::parse_from_path(path)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<TailConfig, ContractError> {
        let config = parser::parse(content, format)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Parse configuration from file path without validating it
    pub fn parse_from_path(path: &Path) -> Result<TailConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        parser::parse(&content, format)
    }

    /// Parse configuration from string without validating it
    pub fn parse_from_str(content: &str, format: ConfigFormat) -> Result<TailConfig, ContractError> {
        parser::parse(content, format)
    }

    /// Validate a fully assembled configuration
    pub fn validate(config: &TailConfig) -> Result<(), ContractError> {
        validator::validate(config)
    }

    /// Serialize TailConfig to TOML string
    pub fn to_toml(config: &TailConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize TailConfig to JSON string
    pub fn to_json(config: &TailConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}
