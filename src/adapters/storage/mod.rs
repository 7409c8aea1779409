//! Storage adapters.
//!
//! - `InMemoryConversationStore` - Per-sender history held in process memory

mod in_memory_conversation_store;

pub use in_memory_conversation_store::InMemoryConversationStore;
