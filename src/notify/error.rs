// Delivery errors. Logged by the caller; never abort a cycle.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    /// Transport failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Relay answered with a non-success status
    #[error("relay returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("channel not configured: {0}")]
    NotConfigured(String),
}
