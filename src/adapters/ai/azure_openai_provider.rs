//! Azure OpenAI Provider - Implementation of ChatCompletion for Azure-hosted deployments.
//!
//! # Configuration
//!
//! ```ignore
//! let config = AzureOpenAIConfig::new("https://my-resource.openai.azure.com", api_key, "gpt-4o")
//!     .with_api_version("2024-12-01-preview")
//!     .with_timeout(Duration::from_secs(60));
//!
//! let provider = AzureOpenAIProvider::new(config)?;
//! ```
//!
//! Requests go to
//! `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version=...`
//! with an `api-key` header. Each call is attempted exactly once.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::conversation::{Message, ToolCallRequest};
use crate::ports::{AIError, ChatCompletion, CompletionRequest, DataSource, ToolChoice};

/// Configuration for the Azure OpenAI provider.
#[derive(Debug, Clone)]
pub struct AzureOpenAIConfig {
    /// Resource endpoint (e.g., "https://my-resource.openai.azure.com").
    pub endpoint: String,
    /// API key for authentication.
    api_key: Secret<String>,
    /// Default chat deployment name.
    pub deployment: String,
    /// REST API version.
    pub api_version: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl AzureOpenAIConfig {
    /// Creates a new configuration.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: Secret::new(api_key.into()),
            deployment: deployment.into(),
            api_version: "2024-12-01-preview".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Azure OpenAI chat-completion provider.
pub struct AzureOpenAIProvider {
    config: AzureOpenAIConfig,
    client: Client,
}

impl AzureOpenAIProvider {
    /// Creates a new provider with the given configuration.
    pub fn new(config: AzureOpenAIConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the chat completions URL for a deployment (without query).
    fn completions_url(&self, deployment: &str) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions",
            self.config.endpoint.trim_end_matches('/'),
            deployment
        )
    }

    /// Sends a request.
    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let deployment = request
            .deployment
            .as_deref()
            .unwrap_or(&self.config.deployment);
        let body = AzureChatRequest::from_request(request);

        self.client
            .post(self.completions_url(deployment))
            .query(&[("api-version", self.config.api_version.as_str())])
            .header("api-key", self.config.api_key())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok());
        let error_body = response.text().await.unwrap_or_default();

        Err(error_for_status(status.as_u16(), &error_body, retry_after))
    }

    /// Parses a completion response.
    async fn parse_response(&self, response: Response) -> Result<Message, AIError> {
        let response = self.handle_response_status(response).await?;

        let azure_response: AzureChatResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        message_from_response(azure_response)
    }
}

#[async_trait]
impl ChatCompletion for AzureOpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<Message, AIError> {
        tracing::debug!(
            messages = request.messages.len(),
            tools = request.tools.len(),
            data_sources = request.data_sources.len(),
            "Requesting chat completion"
        );

        let response = self.send_request(&request).await?;
        let message = self.parse_response(response).await?;

        tracing::debug!(
            tool_calls = message.tool_calls.len(),
            "Chat completion received"
        );
        Ok(message)
    }
}

/// Maps a non-success HTTP status to an error.
fn error_for_status(status: u16, body: &str, retry_after: Option<u32>) -> AIError {
    match status {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::rate_limited(retry_after.unwrap_or(30)),
        400 if body.contains("content_filter") => AIError::content_filtered(body),
        400 | 404 | 422 => AIError::invalid_request(format!("status {}: {}", status, body)),
        500..=599 => AIError::unavailable(format!("Server error {}: {}", status, body)),
        _ => AIError::network(format!("Unexpected status {}: {}", status, body)),
    }
}

/// Extracts the first choice's message.
fn message_from_response(response: AzureChatResponse) -> Result<Message, AIError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AIError::parse("No choices in response"))?;

    let tool_calls = choice.message.tool_calls.unwrap_or_default();

    if choice.finish_reason.as_deref() == Some("content_filter")
        && choice.message.content.is_none()
        && tool_calls.is_empty()
    {
        return Err(AIError::content_filtered("response withheld by content filter"));
    }

    Ok(Message::assistant_with_tool_calls(
        choice.message.content,
        tool_calls,
    ))
}

// ----- Azure OpenAI API Types -----

#[derive(Debug, Serialize)]
struct AzureChatRequest<'a> {
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    data_sources: &'a [DataSource],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl<'a> AzureChatRequest<'a> {
    fn from_request(request: &'a CompletionRequest) -> Self {
        let tools: Vec<serde_json::Value> = request
            .tools
            .iter()
            .map(|t| t.to_openai_format())
            .collect();
        let tool_choice = if tools.is_empty() {
            None
        } else {
            request.tool_choice
        };

        Self {
            messages: &request.messages,
            tools,
            tool_choice,
            data_sources: &request.data_sources,
            temperature: request.temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AzureChatResponse {
    choices: Vec<AzureChoice>,
}

#[derive(Debug, Deserialize)]
struct AzureChoice {
    message: AzureResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AzureResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallRequest>>,
}
