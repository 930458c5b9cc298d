// Notification channels: log (always on) and an HTTP e-mail relay.

mod logger;
mod webhook;

pub use logger::LogChannel;
pub use webhook::{RelayMessage, WebhookChannel};

use async_trait::async_trait;

use super::{ChannelError, NotifyEvent};

/// A delivery target for notification events.
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, event: &NotifyEvent) -> Result<(), ChannelError>;
}
