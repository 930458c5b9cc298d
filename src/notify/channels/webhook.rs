// HTTP e-mail relay: POSTs sender/recipients/subject/body as JSON.
// The relay (SES bridge, transactional mail API, ...) owns actual delivery.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::NotifyChannel;
use crate::notify::{ChannelError, NotifyEvent};

/// JSON body sent to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayMessage {
    pub sender: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

pub struct WebhookChannel {
    url: String,
    sender: String,
    recipients: Vec<String>,
    client: reqwest::Client,
}

impl WebhookChannel {
    pub fn new(
        url: String,
        sender: String,
        recipients: Vec<String>,
        timeout: Duration,
    ) -> Result<Self, ChannelError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(crate::version::user_agent())
            .build()?;
        Ok(Self {
            url,
            sender,
            recipients,
            client,
        })
    }

    /// Record alerts go to the subscriber list; acknowledgements only to the new subscriber.
    pub fn message_for(&self, event: &NotifyEvent) -> RelayMessage {
        let recipients = match event {
            NotifyEvent::RecordBroken { .. } => self.recipients.clone(),
            NotifyEvent::SubscriptionAck { subscriber, .. } => vec![subscriber.clone()],
        };
        RelayMessage {
            sender: self.sender.clone(),
            recipients,
            subject: event.subject(),
            body: event.body(),
        }
    }
}

#[async_trait]
impl NotifyChannel for WebhookChannel {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn send(&self, event: &NotifyEvent) -> Result<(), ChannelError> {
        let message = self.message_for(event);
        if message.recipients.is_empty() {
            return Err(ChannelError::NotConfigured(
                "notify.recipients is empty".to_string(),
            ));
        }

        debug!(
            channel = "webhook",
            event = event.kind(),
            recipients = message.recipients.len(),
            "Sending notification"
        );
        let response = self.client.post(&self.url).json(&message).send().await?;

        if response.status().is_success() {
            debug!(channel = "webhook", "Notification accepted by relay");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(
                channel = "webhook",
                status = %status,
                body = %body,
                "relay request failed"
            );
            Err(ChannelError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
