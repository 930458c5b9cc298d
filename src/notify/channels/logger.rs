// Writes the composed message to the application log.

use async_trait::async_trait;
use tracing::info;

use super::NotifyChannel;
use crate::notify::{ChannelError, NotifyEvent};

pub struct LogChannel;

#[async_trait]
impl NotifyChannel for LogChannel {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, event: &NotifyEvent) -> Result<(), ChannelError> {
        info!(
            channel = "log",
            event = event.kind(),
            subject = %event.subject(),
            body = %event.body(),
            "notification"
        );
        Ok(())
    }
}
