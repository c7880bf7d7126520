//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Notifier creation error
    #[error("failed to create notifier '{name}': {message}")]
    NotifierCreation { name: String, message: String },
}

impl DispatcherError {
    /// Create a notifier creation error
    pub fn notifier_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotifierCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
