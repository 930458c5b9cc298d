// Notification sink: composes record alerts and dispatches them to every channel.
// Delivery results are handed back to the caller; nothing here retries or panics.

pub mod channels;
mod error;
mod events;

pub use channels::{LogChannel, NotifyChannel, RelayMessage, WebhookChannel};
pub use error::ChannelError;
pub use events::NotifyEvent;

use std::sync::Arc;
use std::time::Duration;

use crate::config::NotifyConfig;
use tracing::{debug, info, warn};

/// Per-channel delivery result.
pub type Delivery = (String, Result<(), ChannelError>);

pub struct Notifier {
    channels: Vec<Arc<dyn NotifyChannel>>,
    disabled: bool,
}

impl Notifier {
    /// Log channel always; webhook channel when `notify.webhook_url` is set.
    pub fn from_config(config: &NotifyConfig) -> Result<Self, ChannelError> {
        if !config.enabled {
            info!("Notifications disabled via notify.enabled");
            return Ok(Self::disabled());
        }

        let mut channels: Vec<Arc<dyn NotifyChannel>> = vec![Arc::new(LogChannel)];
        if let Some(url) = &config.webhook_url {
            channels.push(Arc::new(WebhookChannel::new(
                url.clone(),
                config.sender.clone(),
                config.recipients.clone(),
                Duration::from_secs(config.timeout_secs),
            )?));
            info!(recipients = config.recipients.len(), "Webhook notifications enabled");
        }

        Ok(Self::with_channels(channels))
    }

    pub fn with_channels(channels: Vec<Arc<dyn NotifyChannel>>) -> Self {
        Self {
            channels,
            disabled: false,
        }
    }

    pub const fn disabled() -> Self {
        Self {
            channels: vec![],
            disabled: true,
        }
    }

    pub fn channel_count(&self) -> usize {
        if self.disabled { 0 } else { self.channels.len() }
    }

    /// Alerts subscribers about a new record. Does nothing when `has_new_record` is false.
    pub async fn notify_record(
        &self,
        has_new_record: bool,
        new_value: f64,
        previous_value: Option<f64>,
        location: &str,
        depth_context: Option<&str>,
    ) -> Vec<Delivery> {
        if !has_new_record {
            debug!("No record broken, nothing to send");
            return vec![];
        }
        self.send(NotifyEvent::RecordBroken {
            location: location.to_string(),
            depth: depth_context.map(str::to_string),
            new_value,
            previous_value,
        })
        .await
    }

    /// Confirms a new subscription. Unlike record alerts, a failed channel is
    /// returned to the caller; every channel is still tried.
    pub async fn acknowledge(&self, location: &str, subscriber: &str) -> Result<usize, ChannelError> {
        let results = self
            .send(NotifyEvent::SubscriptionAck {
                location: location.to_string(),
                subscriber: subscriber.to_string(),
            })
            .await;
        let mut delivered = 0;
        let mut first_error = None;
        for (channel, result) in results {
            match result {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(channel = %channel, error = %e, "acknowledgement not delivered");
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(delivered),
        }
    }

    /// Sends to every channel in order and collects the results.
    pub async fn send(&self, event: NotifyEvent) -> Vec<Delivery> {
        if self.disabled || self.channels.is_empty() {
            debug!(event = event.kind(), "Notifications disabled, skipping event");
            return vec![];
        }

        let mut results = Vec::with_capacity(self.channels.len());
        for channel in &self.channels {
            let result = channel.send(&event).await;
            results.push((channel.name().to_string(), result));
        }
        results
    }
}
