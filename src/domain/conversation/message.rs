//! Chat messages.
//!
//! A message is one entry in the ordered chat transcript sent to the
//! completion service. Serialization matches the chat-completion wire format:
//! `content` is always present (possibly `null`), while `tool_calls` and
//! `tool_call_id` are omitted when empty.

use serde::{Deserialize, Serialize};

use super::tool_call::ToolCallRequest;

/// Role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions steering the assistant.
    System,
    /// End-user input.
    User,
    /// Model output.
    Assistant,
    /// Output of a tool invocation.
    Tool,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,

    /// Text content. Assistant messages that only carry tool calls have none.
    pub content: Option<String>,

    /// Tool invocations requested by the assistant.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,

    /// Call id this message answers (tool messages only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    /// Creates a plain assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(Role::Assistant, content)
    }

    /// Creates an assistant message that requests tool invocations.
    pub fn assistant_with_tool_calls(
        content: Option<String>,
        tool_calls: Vec<ToolCallRequest>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_calls,
            tool_call_id: None,
        }
    }

    /// Creates a tool message answering the given call id.
    pub fn tool_result(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(call_id.into()),
        }
    }

    /// Returns true if the assistant asked for at least one tool.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Text content, or an empty string when absent.
    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_message_serializes_to_wire_format() {
        let json = serde_json::to_value(Message::user("Hi")).unwrap();
        assert_eq!(json, json!({"role": "user", "content": "Hi"}));
    }

    #[test]
    fn tool_result_carries_call_id() {
        let json = serde_json::to_value(Message::tool_result("call_1", "42")).unwrap();
        assert_eq!(
            json,
            json!({"role": "tool", "content": "42", "tool_call_id": "call_1"})
        );
    }

    #[test]
    fn assistant_tool_call_message_serializes_null_content() {
        let message = Message::assistant_with_tool_calls(
            None,
            vec![ToolCallRequest::new("call_1", "rag_search", r#"{"query":"hotels"}"#)],
        );
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["role"], "assistant");
        assert!(json["content"].is_null());
        assert_eq!(json["tool_calls"][0]["id"], "call_1");
        assert_eq!(json["tool_calls"][0]["type"], "function");
        assert_eq!(json["tool_calls"][0]["function"]["name"], "rag_search");
    }

    #[test]
    fn content_or_empty_handles_missing_content() {
        let message = Message::assistant_with_tool_calls(None, Vec::new());
        assert_eq!(message.content_or_empty(), "");
        assert!(!message.has_tool_calls());
    }

    #[test]
    fn deserializes_message_without_optional_fields() {
        let message: Message =
            serde_json::from_str(r#"{"role":"assistant","content":"Hello"}"#).unwrap();
        assert_eq!(message, Message::assistant("Hello"));
    }
}
