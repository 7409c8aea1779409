//! Conversation setup shared by the inbound-message and chat handlers.

use std::sync::Arc;

use crate::domain::conversation::Conversation;
use crate::ports::ConversationStore;

/// Store key prefix for WhatsApp senders.
pub(crate) const WHATSAPP_NAMESPACE: &str = "whatsapp";
/// Store key prefix for `/chat` and console sessions.
pub(crate) const CHAT_NAMESPACE: &str = "chat";

/// Where a turn's conversation comes from and goes back to.
///
/// Keys are stored as `<namespace>:<id>` so a channel can never read
/// another channel's history.
#[derive(Clone)]
pub(crate) struct TurnHistory {
    store: Option<Arc<dyn ConversationStore>>,
    system_prompt: String,
    namespace: &'static str,
}

impl TurnHistory {
    pub(crate) fn new(
        store: Option<Arc<dyn ConversationStore>>,
        system_prompt: String,
        namespace: &'static str,
    ) -> Self {
        Self {
            store,
            system_prompt,
            namespace,
        }
    }

    fn store_key(&self, id: &str) -> String {
        format!("{}:{}", self.namespace, id)
    }

    /// Retained history plus the new user text, or a fresh
    /// system + user conversation when nothing is retained.
    pub(crate) async fn begin(&self, id: &str, text: &str) -> Conversation {
        let retained = match &self.store {
            Some(store) => store.load(&self.store_key(id)).await,
            None => None,
        };

        let mut conversation = match retained {
            Some(mut conversation) => {
                tracing::debug!(namespace = self.namespace, id, turns = conversation.len(), "Resuming conversation");
                conversation.ensure_system(self.system_prompt.as_str());
                conversation
            }
            None => Conversation::new(self.system_prompt.as_str()),
        };
        conversation.push_user(text);
        conversation
    }

    /// Keeps the completed conversation when history is retained.
    pub(crate) async fn finish(&self, id: &str, conversation: Conversation) {
        if let Some(store) = &self.store {
            store.save(&self.store_key(id), conversation).await;
        }
    }
}
