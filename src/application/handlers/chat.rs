//! Chat command handler.
//!
//! Direct question/answer entry point used by `POST /chat` and the console.
//! Unlike the webhook path, faults are returned to the caller.

use std::sync::Arc;
use thiserror::Error;

use crate::application::{ChatError, ChatOrchestrator};
use crate::ports::ConversationStore;

use super::turn::{TurnHistory, CHAT_NAMESPACE};

/// Command to answer one chat message.
#[derive(Debug, Clone)]
pub struct ChatCommand {
    /// Caller-chosen conversation key.
    pub chat_id: String,
    pub text: String,
}

impl ChatCommand {
    pub fn new(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
        }
    }
}

/// Result of a chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResult {
    pub chat_id: String,
    pub reply: String,
}

/// Errors that can occur when answering a chat message.
#[derive(Debug, Error)]
pub enum ChatCommandError {
    /// Message text is empty or whitespace only.
    #[error("message text cannot be empty")]
    EmptyText,

    #[error(transparent)]
    Chat(#[from] ChatError),
}

/// Handler for direct chat messages.
pub struct ChatHandler {
    orchestrator: ChatOrchestrator,
    history: TurnHistory,
}

impl ChatHandler {
    pub fn new(
        orchestrator: ChatOrchestrator,
        store: Option<Arc<dyn ConversationStore>>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            orchestrator,
            history: TurnHistory::new(store, system_prompt.into(), CHAT_NAMESPACE),
        }
    }

    pub async fn handle(&self, cmd: ChatCommand) -> Result<ChatResult, ChatCommandError> {
        let text = cmd.text.trim();
        if text.is_empty() {
            return Err(ChatCommandError::EmptyText);
        }

        let mut conversation = self.history.begin(&cmd.chat_id, text).await;
        let reply = self.orchestrator.respond(&mut conversation).await?;
        self.history.finish(&cmd.chat_id, conversation).await;

        Ok(ChatResult {
            chat_id: cmd.chat_id,
            reply,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockChatCompletion, MockError};
    use crate::adapters::storage::InMemoryConversationStore;
    use crate::domain::tools::ToolRegistry;
    use crate::ports::AIError;

    fn handler(
        completion: Arc<MockChatCompletion>,
        store: Option<Arc<dyn ConversationStore>>,
    ) -> ChatHandler {
        ChatHandler::new(
            ChatOrchestrator::new(completion, Arc::new(ToolRegistry::new())),
            store,
            "Be helpful.",
        )
    }

    #[tokio::test]
    async fn answers_with_chat_id() {
        let completion = Arc::new(MockChatCompletion::new().with_reply("Sure."));
        let handler = handler(completion, None);

        let result = handler
            .handle(ChatCommand::new("abc", "Can I book?"))
            .await
            .unwrap();

        assert_eq!(
            result,
            ChatResult {
                chat_id: "abc".to_string(),
                reply: "Sure.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn empty_text_is_rejected_without_calls() {
        let completion = Arc::new(MockChatCompletion::new());
        let handler = handler(completion.clone(), None);

        let result = handler.handle(ChatCommand::new("abc", "   ")).await;

        assert!(matches!(result, Err(ChatCommandError::EmptyText)));
        assert_eq!(completion.call_count(), 0);
    }

    #[tokio::test]
    async fn completion_fault_is_returned() {
        let completion =
            Arc::new(MockChatCompletion::new().with_error(MockError::AuthenticationFailed));
        let handler = handler(completion, None);

        let result = handler.handle(ChatCommand::new("abc", "Hi")).await;

        assert!(matches!(
            result,
            Err(ChatCommandError::Chat(ChatError::Completion(
                AIError::AuthenticationFailed
            )))
        ));
    }

    #[tokio::test]
    async fn history_is_keyed_by_chat_id() {
        let completion = Arc::new(MockChatCompletion::new());
        let store: Arc<dyn ConversationStore> = Arc::new(InMemoryConversationStore::without_expiry());
        let handler = handler(completion.clone(), Some(store));

        handler.handle(ChatCommand::new("a", "One")).await.unwrap();
        handler.handle(ChatCommand::new("b", "Other")).await.unwrap();
        handler.handle(ChatCommand::new("a", "Two")).await.unwrap();

        let calls = completion.get_calls();
        assert_eq!(calls[1].messages.len(), 2);
        assert_eq!(calls[2].messages.len(), 4);
    }
}
