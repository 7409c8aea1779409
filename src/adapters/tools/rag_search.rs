//! Vector RAG tool backed by Azure OpenAI "on your data".
//!
//! The tool sends one grounded completion request with an Azure AI Search
//! data source attached and returns the answer text. Every failure is folded
//! into a `[RAG]`-tagged string so the model always receives a tool result.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::sync::Arc;

use crate::config::{AppConfig, DEFAULT_SYSTEM_PROMPT};
use crate::domain::conversation::{parse_history, Conversation};
use crate::domain::tools::ToolDescriptor;
use crate::ports::{
    optional_str, required_str, AzureSearchDataSource, ChatCompletion, CompletionRequest,
    DataSource, Tool, ToolError,
};

/// Tool name advertised to the model.
pub const RAG_SEARCH_TOOL: &str = "rag_search";

/// The seven values the vector RAG call needs.
///
/// Each is optional here; [`RagSettings::missing`] reports the absent ones by
/// their environment variable names.
#[derive(Debug, Clone, Default)]
pub struct RagSettings {
    pub openai_endpoint: Option<String>,
    pub openai_key: Option<SecretString>,
    pub chat_model: Option<String>,
    pub embedding_model: Option<String>,
    pub search_endpoint: Option<String>,
    pub search_key: Option<SecretString>,
    pub index_name: Option<String>,
}

impl RagSettings {
    /// Collects the settings from the loaded configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            openai_endpoint: config.openai.endpoint.clone(),
            openai_key: config.openai.api_key.clone(),
            chat_model: config.openai.chat_model.clone(),
            embedding_model: config.openai.embedding_model.clone(),
            search_endpoint: config.search.endpoint.clone(),
            search_key: config.search.api_key.clone(),
            index_name: config.search.index_name.clone(),
        }
    }

    /// Names of absent or empty settings, in declaration order.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("OPEN_AI_ENDPOINT", self.openai_endpoint.as_deref()),
            ("OPEN_AI_KEY", secret(&self.openai_key)),
            ("CHAT_MODEL", self.chat_model.as_deref()),
            ("EMBEDDING_MODEL", self.embedding_model.as_deref()),
            ("SEARCH_ENDPOINT", self.search_endpoint.as_deref()),
            ("SEARCH_KEY", secret(&self.search_key)),
            ("INDEX_NAME", self.index_name.as_deref()),
        ]
        .into_iter()
        .filter(|(_, value)| value.map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }

    /// Builds the search data source. `None` when any search value is absent.
    fn data_source(&self) -> Option<DataSource> {
        Some(DataSource::AzureSearch(AzureSearchDataSource {
            endpoint: self.search_endpoint.clone()?,
            index_name: self.index_name.clone()?,
            key: self.search_key.clone()?,
            embedding_deployment: self.embedding_model.clone()?,
        }))
    }
}

fn secret(value: &Option<SecretString>) -> Option<&str> {
    value.as_ref().map(|v| v.expose_secret().as_str())
}

/// `rag_search` tool: grounded answer from the travel knowledge base.
pub struct RagSearchTool {
    descriptor: ToolDescriptor,
    settings: RagSettings,
    completion: Arc<dyn ChatCompletion>,
    system_prompt: String,
}

impl RagSearchTool {
    pub fn new(completion: Arc<dyn ChatCompletion>, settings: RagSettings) -> Self {
        Self {
            descriptor: descriptor(),
            settings,
            completion,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Overrides the system instruction inserted when history has none.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    async fn answer(&self, query: &str, history_json: Option<&str>) -> Result<String, String> {
        let missing = self.settings.missing();
        if !missing.is_empty() {
            return Err(format!("[RAG] Missing env vars: {}", missing.join(", ")));
        }

        let mut conversation = Conversation::from_messages(
            parse_history(history_json)
                .iter()
                .map(|entry| entry.to_message())
                .collect(),
        );
        conversation.ensure_system(self.system_prompt.as_str());
        conversation.push_user(query);

        let mut request = CompletionRequest::new(conversation.into_messages());
        if let Some(source) = self.settings.data_source() {
            request = request.with_data_source(source);
        }
        if let Some(model) = &self.settings.chat_model {
            request = request.with_deployment(model.as_str());
        }

        let reply = self
            .completion
            .complete(request)
            .await
            .map_err(|e| format!("[RAG] Error: {}", e))?;

        Ok(reply.content.unwrap_or_default())
    }
}

#[async_trait]
impl Tool for RagSearchTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, args: serde_json::Value) -> Result<String, ToolError> {
        let query = required_str(&args, "query")?;
        let history_json = optional_str(&args, "history_json")?;

        match self.answer(query, history_json).await {
            Ok(text) => Ok(text),
            Err(tagged) => {
                tracing::warn!(tool = RAG_SEARCH_TOOL, error = %tagged, "RAG lookup failed");
                Ok(tagged)
            }
        }
    }
}

fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        RAG_SEARCH_TOOL,
        "Answer a question about Margie's Travel services using the travel knowledge base.",
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The user's question."
                },
                "history_json": {
                    "type": "string",
                    "description": "Optional JSON list of prior {role, content} messages."
                }
            },
            "required": ["query"]
        }),
    )
}
