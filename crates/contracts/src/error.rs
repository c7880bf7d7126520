//! Layered error definitions
//!
//! Categorized by source: config / file / delivery

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error (missing or out-of-range field)
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== File Errors =====
    /// Tailed file could not be opened
    #[error("cannot open '{}': {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Read failure while polling
    #[error("read error at offset {offset}: {source}")]
    Read {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    // ===== Delivery Errors =====
    /// Single delivery attempt failed
    #[error("notifier '{notifier}' delivery error: {message}")]
    Delivery { notifier: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create validation error for a required field that was not supplied
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::config_validation(field, "required value is missing")
    }

    /// Create file open error
    pub fn file_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOpen {
            path: path.into(),
            source,
        }
    }

    /// Create read error
    pub fn read(offset: u64, source: std::io::Error) -> Self {
        Self::Read { offset, source }
    }

    /// Create delivery error
    pub fn delivery(notifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Delivery {
            notifier: notifier.into(),
            message: message.into(),
        }
    }
}
