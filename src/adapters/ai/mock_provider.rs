//! Mock chat completion for testing.
//!
//! Provides a scripted implementation of the ChatCompletion port, allowing
//! tests to run without calling the hosted service.
//!
//! # Example
//!
//! ```ignore
//! let completion = MockChatCompletion::new()
//!     .with_tool_call("call_1", "rag_search", r#"{"query":"hotels"}"#)
//!     .with_reply("We have three hotels in Paris.");
//!
//! let reply = orchestrator.respond(&mut conversation).await?;
//! assert_eq!(completion.call_count(), 2);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::conversation::{Message, ToolCallRequest};
use crate::ports::{AIError, ChatCompletion, CompletionRequest};

/// Scripted chat completion.
///
/// Responses are consumed in order; once exhausted, a fixed default reply is
/// returned.
#[derive(Debug, Clone, Default)]
pub struct MockChatCompletion {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return an assistant message.
    Message(Message),
    /// Return an error.
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

impl MockChatCompletion {
    /// Creates a new mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plain assistant reply to the queue.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        self.with_message(Message::assistant(content))
    }

    /// Adds an assistant message requesting a single tool call.
    pub fn with_tool_call(
        self,
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        self.with_tool_calls(vec![ToolCallRequest::new(id, name, arguments)])
    }

    /// Adds an assistant message requesting several tool calls.
    pub fn with_tool_calls(self, calls: Vec<ToolCallRequest>) -> Self {
        self.with_message(Message::assistant_with_tool_calls(None, calls))
    }

    /// Adds an arbitrary message to the queue.
    pub fn with_message(self, message: Message) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Message(message));
        self
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded requests.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn next_response(&self) -> MockResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockResponse::Message(Message::assistant("Mock response")))
    }
}

#[async_trait]
impl ChatCompletion for MockChatCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<Message, AIError> {
        self.calls.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Message(message) => Ok(message),
            MockResponse::Error(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_scripted_responses_in_order() {
        let mock = MockChatCompletion::new()
            .with_tool_call("call_1", "rag_search", "{}")
            .with_reply("Done");

        let first = mock.complete(CompletionRequest::default()).await.unwrap();
        let second = mock.complete(CompletionRequest::default()).await.unwrap();

        assert_eq!(first.tool_calls[0].id, "call_1");
        assert_eq!(second.content.as_deref(), Some("Done"));
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn falls_back_to_default_reply() {
        let mock = MockChatCompletion::new();
        let reply = mock.complete(CompletionRequest::default()).await.unwrap();
        assert_eq!(reply.content.as_deref(), Some("Mock response"));
    }

    #[tokio::test]
    async fn returns_scripted_errors() {
        let mock = MockChatCompletion::new().with_error(MockError::AuthenticationFailed);
        let result = mock.complete(CompletionRequest::default()).await;
        assert!(matches!(result, Err(AIError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn records_requests() {
        let mock = MockChatCompletion::new();
        mock.complete(CompletionRequest::new(vec![Message::user("Hi")]).with_deployment("gpt-4o"))
            .await
            .unwrap();

        let calls = mock.get_calls();
        assert_eq!(calls[0].messages[0], Message::user("Hi"));
        assert_eq!(calls[0].deployment.as_deref(), Some("gpt-4o"));
    }
}
