//! In-Memory Conversation Store Adapter
//!
//! Keeps each sender's conversation in process memory. Entries idle for
//! longer than the configured TTL are dropped on access and by the purge
//! task started with `spawn_purge_task`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::conversation::Conversation;
use crate::ports::ConversationStore;

/// Shortest accepted period between purges
const MIN_PURGE_PERIOD: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
struct StoredConversation {
    conversation: Conversation,
    touched_at: DateTime<Utc>,
}

/// In-memory per-sender conversation history
#[derive(Debug, Clone)]
pub struct InMemoryConversationStore {
    conversations: Arc<RwLock<HashMap<String, StoredConversation>>>,
    ttl: Option<Duration>,
}

impl InMemoryConversationStore {
    /// Create a store whose entries expire after `ttl` without activity
    pub fn new(ttl: Duration) -> Self {
        Self {
            conversations: Arc::new(RwLock::new(HashMap::new())),
            ttl: Some(ttl),
        }
    }

    /// Create a store that keeps entries for the process lifetime
    pub fn without_expiry() -> Self {
        Self {
            conversations: Arc::new(RwLock::new(HashMap::new())),
            ttl: None,
        }
    }

    /// Get the number of stored conversations
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every expired entry, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut conversations = self.conversations.write().await;
        let before = conversations.len();
        conversations.retain(|_, stored| !self.is_expired(stored, now));
        before - conversations.len()
    }

    /// Purge expired entries every `period` until the task is aborted.
    pub fn spawn_purge_task(&self, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        let period = period.max(MIN_PURGE_PERIOD);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let removed = store.purge_expired().await;
                if removed > 0 {
                    tracing::debug!(removed, "Purged expired conversations");
                }
            }
        })
    }

    fn is_expired(&self, stored: &StoredConversation, now: DateTime<Utc>) -> bool {
        let Some(ttl) = self.ttl else {
            return false;
        };
        let idle = now
            .signed_duration_since(stored.touched_at)
            .to_std()
            .unwrap_or_default();
        idle >= ttl
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn load(&self, key: &str) -> Option<Conversation> {
        let now = Utc::now();
        {
            let conversations = self.conversations.read().await;
            match conversations.get(key) {
                None => return None,
                Some(stored) if !self.is_expired(stored, now) => {
                    return Some(stored.conversation.clone())
                }
                Some(_) => {}
            }
        }

        tracing::debug!(key, "Conversation history expired");
        self.conversations.write().await.remove(key);
        None
    }

    async fn save(&self, key: &str, conversation: Conversation) {
        let mut conversations = self.conversations.write().await;
        conversations.insert(
            key.to_string(),
            StoredConversation {
                conversation,
                touched_at: Utc::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation() -> Conversation {
        let mut conversation = Conversation::new("system");
        conversation.push_user("Hi");
        conversation
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let store = InMemoryConversationStore::new(Duration::from_secs(60));
        store.save("15550001", conversation()).await;

        let loaded = store.load("15550001").await.unwrap();
        assert_eq!(loaded, conversation());
        assert!(store.load("15550002").await.is_none());
    }

    #[tokio::test]
    async fn expired_entries_are_dropped_on_load() {
        let store = InMemoryConversationStore::new(Duration::ZERO);
        store.save("15550001", conversation()).await;

        assert!(store.load("15550001").await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn purge_removes_expired_entries() {
        let store = InMemoryConversationStore::new(Duration::ZERO);
        store.save("a", conversation()).await;
        store.save("b", conversation()).await;

        assert_eq!(store.purge_expired().await, 2);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn without_expiry_keeps_entries() {
        let store = InMemoryConversationStore::without_expiry();
        store.save("a", conversation()).await;

        assert_eq!(store.purge_expired().await, 0);
        assert!(store.load("a").await.is_some());
    }

    #[tokio::test]
    async fn purge_task_drops_idle_entries() {
        let store = InMemoryConversationStore::new(Duration::ZERO);
        store.save("a", conversation()).await;
        store.save("b", conversation()).await;

        let task = store.spawn_purge_task(Duration::from_millis(100));
        tokio::time::sleep(Duration::from_millis(250)).await;
        task.abort();

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn purge_task_keeps_live_entries() {
        let store = InMemoryConversationStore::new(Duration::from_secs(60));
        store.save("a", conversation()).await;

        let task = store.spawn_purge_task(Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(150)).await;
        task.abort();

        assert_eq!(store.len().await, 1);
    }
}
