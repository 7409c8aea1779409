//! HandleInboundMessage command handler.
//!
//! Classifies a webhook payload, answers text messages through the chat
//! orchestrator, and relays the reply to the sender. Nothing here fails the
//! webhook: orchestrator faults become the fallback reply and delivery
//! faults are logged.

use std::sync::Arc;

use crate::domain::webhook::{IgnoreReason, InboundEvent};
use crate::ports::{ConversationStore, MessageSender};

use super::turn::{TurnHistory, WHATSAPP_NAMESPACE};
use crate::application::ChatOrchestrator;

/// Command carrying a decoded webhook payload.
#[derive(Debug, Clone)]
pub struct HandleInboundMessageCommand {
    pub payload: serde_json::Value,
}

impl HandleInboundMessageCommand {
    pub fn new(payload: serde_json::Value) -> Self {
        Self { payload }
    }
}

/// Outcome of handling one webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleInboundMessageResult {
    /// A reply was produced and handed to the sender.
    Replied {
        to: String,
        reply: String,
        /// False when the provider did not accept the reply.
        delivered: bool,
    },
    /// The payload carried nothing to answer.
    Ignored(IgnoreReason),
}

impl HandleInboundMessageResult {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }
}

/// Settings the gateway applies to every inbound message.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub system_prompt: String,
    pub fallback_reply: String,
    pub enable_status_filtering: bool,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            system_prompt: crate::config::DEFAULT_SYSTEM_PROMPT.to_string(),
            fallback_reply: "Sorry, something went wrong.".to_string(),
            enable_status_filtering: true,
        }
    }
}

/// Handler for inbound WhatsApp messages.
pub struct HandleInboundMessageHandler {
    orchestrator: ChatOrchestrator,
    sender: Arc<dyn MessageSender>,
    history: TurnHistory,
    fallback_reply: String,
    enable_status_filtering: bool,
}

impl HandleInboundMessageHandler {
    pub fn new(
        orchestrator: ChatOrchestrator,
        sender: Arc<dyn MessageSender>,
        store: Option<Arc<dyn ConversationStore>>,
        settings: GatewaySettings,
    ) -> Self {
        Self {
            orchestrator,
            sender,
            history: TurnHistory::new(store, settings.system_prompt, WHATSAPP_NAMESPACE),
            fallback_reply: settings.fallback_reply,
            enable_status_filtering: settings.enable_status_filtering,
        }
    }

    pub async fn handle(&self, cmd: HandleInboundMessageCommand) -> HandleInboundMessageResult {
        let message = match InboundEvent::parse(&cmd.payload, self.enable_status_filtering) {
            InboundEvent::TextMessage(message) => message,
            InboundEvent::Ignored(reason) => {
                tracing::debug!(%reason, "Ignoring webhook payload");
                return HandleInboundMessageResult::Ignored(reason);
            }
        };

        tracing::info!(
            sender = %message.from,
            message_id = ?message.message_id,
            "Inbound text message"
        );

        let mut conversation = self.history.begin(&message.from, &message.text).await;

        let reply = match self.orchestrator.respond(&mut conversation).await {
            Ok(reply) => {
                self.history.finish(&message.from, conversation).await;
                reply
            }
            Err(e) => {
                tracing::error!(sender = %message.from, error = %e, "Chat round trip failed");
                self.fallback_reply.clone()
            }
        };

        let delivered = match self.sender.send_text(&message.from, &reply).await {
            Ok(receipt) => {
                tracing::debug!(sender = %message.from, status = receipt.status, "Reply delivered");
                true
            }
            Err(e) => {
                tracing::error!(sender = %message.from, error = %e, "Reply delivery failed");
                false
            }
        };

        HandleInboundMessageResult::Replied {
            to: message.from,
            reply,
            delivered,
        }
    }
}
