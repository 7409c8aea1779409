//! Conversation - ordered chat transcript for one exchange.

use super::message::{Message, Role};

/// Ordered list of messages sent to the completion service.
///
/// A conversation has no persistence of its own; callers that retain history
/// store the whole value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Starts a conversation with a system instruction.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    /// Wraps existing messages without modification.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Appends a message to the end of the transcript.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Appends a user message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns true if any message carries the system role.
    pub fn has_system(&self) -> bool {
        self.messages.iter().any(|m| m.role == Role::System)
    }

    /// Inserts a system message at the front if none is present.
    pub fn ensure_system(&mut self, system_prompt: impl Into<String>) {
        if !self.has_system() {
            self.messages.insert(0, Message::system(system_prompt));
        }
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_starts_with_system_message() {
        let conversation = Conversation::new("Be helpful");
        assert_eq!(conversation.len(), 1);
        assert!(conversation.has_system());
        assert_eq!(conversation.messages()[0].role, Role::System);
    }

    #[test]
    fn push_preserves_order() {
        let mut conversation = Conversation::new("Be helpful");
        conversation.push_user("Hi");
        conversation.push(Message::assistant("Hello"));

        let roles: Vec<Role> = conversation.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
        assert_eq!(conversation.last().unwrap().content.as_deref(), Some("Hello"));
    }

    #[test]
    fn ensure_system_inserts_at_front() {
        let mut conversation = Conversation::from_messages(vec![Message::user("Hi")]);
        assert!(!conversation.has_system());

        conversation.ensure_system("Be helpful");

        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.messages()[0].role, Role::System);
        assert_eq!(conversation.messages()[1].role, Role::User);
    }

    #[test]
    fn ensure_system_keeps_existing_instruction() {
        let mut conversation = Conversation::new("Original");
        conversation.ensure_system("Replacement");

        assert_eq!(conversation.len(), 1);
        assert_eq!(
            conversation.messages()[0].content.as_deref(),
            Some("Original")
        );
    }
}
