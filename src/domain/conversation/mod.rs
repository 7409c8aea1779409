//! Conversation domain module.
//!
//! Chat messages, tool call requests/results, and the ordered transcript the
//! orchestrator sends to the completion service.

mod conversation;
mod history;
mod message;
mod tool_call;

pub use conversation::Conversation;
pub use history::{parse_history, HistoryEntry};
pub use message::{Message, Role};
pub use tool_call::{ToolCallRequest, ToolResult};
