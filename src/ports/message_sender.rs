//! Message Sender Port - Outbound replies to the messaging provider.

use async_trait::async_trait;
use thiserror::Error;

/// Port for delivering a text reply to an end user.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a text message to the recipient.
    ///
    /// Implementations make exactly one attempt.
    async fn send_text(&self, to: &str, body: &str) -> Result<SendReceipt, MessagingError>;
}

/// Provider acknowledgement for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// HTTP status returned by the provider
    pub status: u16,
    /// Provider message id, when returned
    pub message_id: Option<String>,
}

/// Errors raised while sending a message.
#[derive(Debug, Clone, Error)]
pub enum MessagingError {
    /// Provider rejected the request
    #[error("provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Request could not be delivered
    #[error("network error: {0}")]
    Network(String),

    /// Sender is not configured
    #[error("sender not configured: {0}")]
    NotConfigured(&'static str),
}

impl MessagingError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }
}
