//! Chat orchestrator - one user turn through the tool-calling round trip.
//!
//! The turn makes at most two completion calls:
//!
//! 1. The conversation is sent with every registered tool offered
//!    (`tool_choice = auto`).
//! 2. If the model answers directly, that answer is the reply.
//! 3. Otherwise each requested tool is dispatched in order, one tool message
//!    is appended per call, and a second request without tools produces the
//!    reply.
//!
//! The conversation is mutated in place so callers that retain history see
//! the assistant and tool messages that were exchanged. A turn cut short by
//! the reply deadline leaves a partial transcript that must not be retained.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::domain::conversation::{Conversation, Message};
use crate::domain::foundation::{DomainError, StateMachine};
use crate::domain::orchestrator::{OrchestratorState, PendingToolCalls};
use crate::domain::tools::ToolRegistry;
use crate::ports::{AIError, ChatCompletion, CompletionRequest, ToolChoice};

/// Errors that end a chat turn without a reply.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The completion service failed.
    #[error(transparent)]
    Completion(#[from] AIError),

    /// The round trip left its expected sequence.
    #[error("chat round trip violated: {0}")]
    Invariant(#[from] DomainError),

    /// No reply within the configured deadline.
    #[error("no reply within {0:?}")]
    TimedOut(Duration),
}

/// Drives a conversation through the completion service and tool registry.
#[derive(Clone)]
pub struct ChatOrchestrator {
    completion: Arc<dyn ChatCompletion>,
    tools: Arc<ToolRegistry>,
    temperature: Option<f32>,
    reply_timeout: Option<Duration>,
}

impl ChatOrchestrator {
    /// Creates a new orchestrator.
    pub fn new(completion: Arc<dyn ChatCompletion>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            completion,
            tools,
            temperature: None,
            reply_timeout: None,
        }
    }

    /// Sets the sampling temperature for both requests.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Bounds the whole turn, tool executions included.
    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = Some(timeout);
        self
    }

    /// Returns the tool registry.
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Produces the assistant reply for the conversation's latest user turn.
    ///
    /// Missing assistant content yields an empty string.
    pub async fn respond(&self, conversation: &mut Conversation) -> Result<String, ChatError> {
        let Some(limit) = self.reply_timeout else {
            return self.round_trip(conversation).await;
        };

        match tokio::time::timeout(limit, self.round_trip(conversation)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout_ms = limit.as_millis() as u64, "Chat round trip timed out");
                Err(ChatError::TimedOut(limit))
            }
        }
    }

    async fn round_trip(&self, conversation: &mut Conversation) -> Result<String, ChatError> {
        let mut state = OrchestratorState::default();

        let first = self.completion.complete(self.first_request(conversation)).await?;

        if !first.has_tool_calls() {
            state = state.transition_to(OrchestratorState::Done)?;
            tracing::debug!(?state, "Model answered without tools");
            return Ok(self.finish(conversation, first));
        }

        state = state.transition_to(OrchestratorState::ExecutingTools)?;
        tracing::debug!(?state, calls = first.tool_calls.len(), "Model requested tools");

        let calls = first.tool_calls.clone();
        let mut pending = PendingToolCalls::new(&calls);
        conversation.push(first);

        for call in &calls {
            let result = self.tools.dispatch(call).await;
            pending.record(result)?;
        }

        for message in pending.into_messages()? {
            conversation.push(message);
        }

        state = state.transition_to(OrchestratorState::AwaitingFinalResponse)?;
        tracing::debug!(?state, "Requesting final response");

        let second = self
            .completion
            .complete(self.final_request(conversation))
            .await?;

        state = state.transition_to(OrchestratorState::Done)?;
        tracing::debug!(?state, "Final response received");

        Ok(self.finish(conversation, second))
    }

    fn first_request(&self, conversation: &Conversation) -> CompletionRequest {
        let mut request = self.base_request(conversation);
        if !self.tools.is_empty() {
            request = request
                .with_tools(self.tools.descriptors())
                .with_tool_choice(ToolChoice::Auto);
        }
        request
    }

    fn final_request(&self, conversation: &Conversation) -> CompletionRequest {
        self.base_request(conversation)
    }

    fn base_request(&self, conversation: &Conversation) -> CompletionRequest {
        let request = CompletionRequest::new(conversation.messages().to_vec());
        match self.temperature {
            Some(t) => request.with_temperature(t),
            None => request,
        }
    }

    fn finish(&self, conversation: &mut Conversation, reply: Message) -> String {
        let text = reply.content_or_empty().to_string();
        conversation.push(Message::assistant(text.as_str()));
        text
    }
}
