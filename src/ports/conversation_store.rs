//! Conversation Store Port - Per-sender chat history between webhook deliveries.
//!
//! Only consulted when history retention is enabled. Implementations are
//! process-local; nothing survives a restart.

use async_trait::async_trait;

use crate::domain::conversation::Conversation;

/// Port for loading and saving a conversation by key.
///
/// Keys are namespaced by channel (`whatsapp:<from>`, `chat:<chat_id>`).
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Returns the retained conversation for a key, if any.
    async fn load(&self, key: &str) -> Option<Conversation>;

    /// Replaces the retained conversation for a key.
    async fn save(&self, key: &str, conversation: Conversation);
}
