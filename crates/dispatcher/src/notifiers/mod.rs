//! Notifier implementations
//!
//! Contains WebhookNotifier and LogNotifier.

mod log;
mod webhook;

pub use self::log::LogNotifier;
pub use self::webhook::{WebhookNotifier, WebhookPayload};

use contracts::{ContractError, DeliveryConfig, DispatchTarget, Notifier, NotifierKind};
use tracing::instrument;

use crate::error::DispatcherError;

/// Notifier selected by configuration
pub enum ConfiguredNotifier {
    Webhook(WebhookNotifier),
    Log(LogNotifier),
}

impl Notifier for ConfiguredNotifier {
    fn name(&self) -> &str {
        match self {
            Self::Webhook(n) => n.name(),
            Self::Log(n) => n.name(),
        }
    }

    async fn deliver(&mut self, text: &str, target: &DispatchTarget) -> Result<(), ContractError> {
        match self {
            Self::Webhook(n) => n.deliver(text, target).await,
            Self::Log(n) => n.deliver(text, target).await,
        }
    }
}

/// Create the notifier named by `config`
#[instrument(
    name = "dispatcher_create_notifier",
    skip(config),
    fields(notifier = ?config.notifier)
)]
pub fn create_notifier(config: &DeliveryConfig) -> Result<ConfiguredNotifier, DispatcherError> {
    match config.notifier {
        NotifierKind::Webhook => {
            let notifier = WebhookNotifier::new(config.username.clone())
                .map_err(|e| DispatcherError::notifier_creation(WebhookNotifier::NAME, e.to_string()))?;
            Ok(ConfiguredNotifier::Webhook(notifier))
        }
        NotifierKind::Log => Ok(ConfiguredNotifier::Log(LogNotifier::new())),
    }
}
