//! Inbound webhook payload classification.
//!
//! The messaging provider posts a nested envelope:
//!
//! ```json
//! {"entry": [{"changes": [{"value": {
//!     "messages": [{"from": "15551234567", "id": "wamid.x", "text": {"body": "Hi"}}]
//! }}]}]}
//! ```
//!
//! Only the first entry, change and message are considered. Anything else is
//! classified with an [`IgnoreReason`] and acknowledged without a reply.

use serde_json::Value;

/// Why a payload produced no reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Delivery/read status callback.
    StatusUpdate,
    /// No `messages` array in the change value.
    NoMessages,
    /// A message without a text body (image, sticker, reaction, ...).
    NonText,
    /// Envelope did not have the expected `entry`/`changes`/`value` shape.
    Malformed,
}

impl IgnoreReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            IgnoreReason::StatusUpdate => "status_update",
            IgnoreReason::NoMessages => "no_messages",
            IgnoreReason::NonText => "non_text",
            IgnoreReason::Malformed => "malformed",
        }
    }
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A text message sent by an end user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage {
    /// Sender identifier (phone number)
    pub from: String,
    /// Message body
    pub text: String,
    /// Provider message id, when supplied
    pub message_id: Option<String>,
}

/// Classified inbound webhook payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    TextMessage(TextMessage),
    Ignored(IgnoreReason),
}

impl InboundEvent {
    /// Classifies a webhook payload.
    ///
    /// With `enable_status_filtering`, status callbacks are recognized before
    /// message extraction and reported as [`IgnoreReason::StatusUpdate`];
    /// without it they fall through to extraction and are reported as
    /// [`IgnoreReason::NoMessages`].
    pub fn parse(payload: &Value, enable_status_filtering: bool) -> Self {
        let Some(value) = change_value(payload) else {
            return InboundEvent::Ignored(IgnoreReason::Malformed);
        };

        let messages = value.get("messages").and_then(Value::as_array);

        if enable_status_filtering
            && messages.map_or(true, |m| m.is_empty())
            && value.get("statuses").is_some()
        {
            return InboundEvent::Ignored(IgnoreReason::StatusUpdate);
        }

        let Some(message) = messages.and_then(|m| m.first()) else {
            return InboundEvent::Ignored(IgnoreReason::NoMessages);
        };

        let text = message
            .get("text")
            .and_then(|t| t.get("body"))
            .and_then(Value::as_str);
        let from = message.get("from").and_then(Value::as_str);

        match (text, from) {
            (Some(text), Some(from)) => InboundEvent::TextMessage(TextMessage {
                from: from.to_string(),
                text: text.to_string(),
                message_id: message
                    .get("id")
                    .and_then(Value::as_str)
                    .map(String::from),
            }),
            _ => InboundEvent::Ignored(IgnoreReason::NonText),
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, InboundEvent::Ignored(_))
    }
}

fn change_value(payload: &Value) -> Option<&Value> {
    payload
        .get("entry")?
        .as_array()?
        .first()?
        .get("changes")?
        .as_array()?
        .first()?
        .get("value")
        .filter(|v| v.is_object())
}
