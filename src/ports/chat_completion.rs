//! Chat Completion Port - Interface for the hosted chat-completion service.
//!
//! This port abstracts the tool-calling chat API so the orchestrator and the
//! retrieval tool can be exercised without network access.
//!
//! # Design
//!
//! - One request in, one assistant [`Message`] out (content and/or tool calls)
//! - Optional retrieval-augmentation data sources ride along with the request
//! - No retries: a failed call surfaces immediately as an [`AIError`]
//!
//! # Example
//!
//! ```ignore
//! let request = CompletionRequest::new(conversation.messages().to_vec())
//!     .with_tools(registry.descriptors())
//!     .with_tool_choice(ToolChoice::Auto)
//!     .with_temperature(0.2);
//!
//! let reply = completion.complete(request).await?;
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::conversation::Message;
use crate::domain::tools::ToolDescriptor;

/// Port for chat completion interactions.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Generate a single completion.
    ///
    /// Returns the assistant message of the first choice.
    async fn complete(&self, request: CompletionRequest) -> Result<Message, AIError>;
}

/// Request for a chat completion.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    /// Conversation messages in order.
    pub messages: Vec<Message>,
    /// Tools the model may call. Empty means no tools are offered.
    pub tools: Vec<ToolDescriptor>,
    /// How the model should choose among the tools.
    pub tool_choice: Option<ToolChoice>,
    /// Retrieval sources grounding the answer.
    pub data_sources: Vec<DataSource>,
    /// Deployment override; the adapter default applies when absent.
    pub deployment: Option<String>,
    /// Temperature for response randomness.
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    /// Creates a new request for the given messages.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Offers tools to the model.
    pub fn with_tools(mut self, tools: Vec<ToolDescriptor>) -> Self {
        self.tools = tools;
        self
    }

    /// Sets the tool choice mode.
    pub fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }

    /// Adds a retrieval data source.
    pub fn with_data_source(mut self, source: DataSource) -> Self {
        self.data_sources.push(source);
        self
    }

    /// Targets a specific deployment.
    pub fn with_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = Some(deployment.into());
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Returns true if tools are offered.
    pub fn offers_tools(&self) -> bool {
        !self.tools.is_empty()
    }
}

/// Tool selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// Model decides whether to call tools.
    Auto,
    /// Model must not call tools.
    None,
    /// Model must call at least one tool.
    Required,
}

/// Retrieval-augmentation source attached to a completion request.
#[derive(Debug, Clone)]
pub enum DataSource {
    AzureSearch(AzureSearchDataSource),
}

/// Vector search over an Azure AI Search index.
#[derive(Debug, Clone)]
pub struct AzureSearchDataSource {
    pub endpoint: String,
    pub index_name: String,
    pub key: SecretString,
    /// Deployment that embeds the query for vector search.
    pub embedding_deployment: String,
}

impl Serialize for DataSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DataSource::AzureSearch(source) => serde_json::json!({
                "type": "azure_search",
                "parameters": {
                    "endpoint": source.endpoint,
                    "index_name": source.index_name,
                    "authentication": {
                        "type": "api_key",
                        "key": source.key.expose_secret(),
                    },
                    "query_type": "vector",
                    "embedding_dependency": {
                        "type": "deployment_name",
                        "deployment_name": source.embedding_deployment,
                    },
                },
            })
            .serialize(serializer),
        }
    }
}

/// Chat completion errors.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Content was filtered for safety.
    #[error("content filtered: {reason}")]
    ContentFiltered {
        /// Reason for filtering.
        reason: String,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl AIError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates a content filtered error.
    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Returns true if a later attempt could succeed.
    ///
    /// Only used to grade log severity; requests are never retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::Unavailable { .. }
                | Self::Network(_)
                | Self::Timeout { .. }
        )
    }
}
