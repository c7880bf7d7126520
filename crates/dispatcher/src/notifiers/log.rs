//! LogNotifier - logs messages via tracing instead of sending them

use contracts::{ContractError, DispatchTarget, Notifier};
use tracing::{info, instrument};

/// Notifier that writes each message to the log (dry run)
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub const NAME: &'static str = "log";

    pub fn new() -> Self {
        Self
    }
}

impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        Self::NAME
    }

    #[instrument(
        name = "log_notifier_deliver",
        skip(self, text, target),
        fields(topic = %target.topic, bytes = text.len())
    )]
    async fn deliver(&mut self, text: &str, target: &DispatchTarget) -> Result<(), ContractError> {
        info!(
            notifier = Self::NAME,
            endpoint = %target.endpoint,
            topic = %target.topic,
            text = %text.trim_end(),
            "Message"
        );
        Ok(())
    }
}
