//! Ports - Interfaces at the external seams of the bot.
//!
//! - `ChatCompletion` - Hosted chat-completion service
//! - `Tool` - Capability the model may invoke
//! - `MessageSender` - Outbound replies to the messaging provider
//! - `ConversationStore` - Optional per-sender history

mod chat_completion;
mod conversation_store;
mod message_sender;
mod tool;

pub use chat_completion::{
    AIError, AzureSearchDataSource, ChatCompletion, CompletionRequest, DataSource, ToolChoice,
};
pub use conversation_store::ConversationStore;
pub use message_sender::{MessageSender, MessagingError, SendReceipt};
pub use tool::{optional_str, required_str, Tool, ToolError};
