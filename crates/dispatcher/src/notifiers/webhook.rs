//! WebhookNotifier - Slack-style incoming webhook over HTTP

use contracts::{ContractError, DispatchTarget, Notifier};
use serde::Serialize;
use tracing::{debug, instrument};

/// Message body, sent form-encoded under the `payload` key
#[derive(Debug, Serialize, PartialEq)]
pub struct WebhookPayload<'a> {
    pub text: &'a str,
    pub channel: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
}

/// Notifier that POSTs each message to a chat webhook.
///
/// One request per delivery with no timeout and no retry. Any 2xx response
/// counts as delivered.
pub struct WebhookNotifier {
    client: reqwest::Client,
    username: Option<String>,
}

impl WebhookNotifier {
    pub const NAME: &'static str = "webhook";

    /// Create a notifier with its own HTTP client
    pub fn new(username: Option<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("chattail/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, username))
    }

    /// Create a notifier around an existing client
    pub fn with_client(client: reqwest::Client, username: Option<String>) -> Self {
        Self { client, username }
    }

    /// Build the payload for one message
    pub fn payload<'a>(&'a self, text: &'a str, target: &'a DispatchTarget) -> WebhookPayload<'a> {
        WebhookPayload {
            text,
            channel: &target.topic,
            username: self.username.as_deref(),
        }
    }

    fn error(message: impl Into<String>) -> ContractError {
        ContractError::delivery(Self::NAME, message)
    }
}

impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        Self::NAME
    }

    #[instrument(
        name = "webhook_notifier_deliver",
        skip(self, text, target),
        fields(topic = %target.topic, bytes = text.len())
    )]
    async fn deliver(&mut self, text: &str, target: &DispatchTarget) -> Result<(), ContractError> {
        let payload = serde_json::to_string(&self.payload(text, target))
            .map_err(|e| Self::error(format!("payload encoding failed: {e}")))?;

        let response = self
            .client
            .post(&target.endpoint)
            .form(&[("payload", payload)])
            .send()
            .await
            .map_err(|e| Self::error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error(format!("endpoint returned {status}")));
        }

        debug!(status = status.as_u16(), "Webhook accepted message");
        Ok(())
    }
}
