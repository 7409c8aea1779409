//! Recording message sender for tests and the console.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::ports::{MessageSender, MessagingError, SendReceipt};

/// A message captured by [`RecordingSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentText {
    pub to: String,
    pub body: String,
}

/// Sender that records every message instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct RecordingSender {
    sent: Arc<Mutex<Vec<SentText>>>,
    fail_with: Option<MessagingError>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send fails with the given error (still recorded).
    pub fn failing(error: MessagingError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }

    /// Returns all recorded messages.
    pub fn sent(&self) -> Vec<SentText> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_text(&self, to: &str, body: &str) -> Result<SendReceipt, MessagingError> {
        self.sent.lock().unwrap().push(SentText {
            to: to.to_string(),
            body: body.to_string(),
        });

        match &self.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(SendReceipt {
                status: 200,
                message_id: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_messages() {
        let sender = RecordingSender::new();
        let receipt = sender.send_text("123", "Hi").await.unwrap();

        assert_eq!(receipt.status, 200);
        assert_eq!(
            sender.sent(),
            vec![SentText {
                to: "123".to_string(),
                body: "Hi".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn failing_sender_still_records() {
        let sender = RecordingSender::failing(MessagingError::network("down"));
        assert!(sender.send_text("123", "Hi").await.is_err());
        assert_eq!(sender.sent_count(), 1);
    }
}
