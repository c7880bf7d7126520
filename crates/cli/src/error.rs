//! Error types for CLI operations.

use contracts::ContractError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration could not be parsed or is incomplete
    #[error("Configuration error: {0}")]
    Config(ContractError),

    /// The tailed file could not be opened
    #[error("{0}")]
    FileOpen(ContractError),

    /// Watcher setup failed
    #[error("Failed to start watcher: {0}")]
    Ingestion(#[from] ingestion::IngestionError),

    /// Notifier setup failed
    #[error("Failed to start dispatcher: {0}")]
    Dispatcher(#[from] dispatcher::DispatcherError),
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
