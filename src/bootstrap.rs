//! Service wiring from loaded configuration.
//!
//! Everything is built once at startup and shared read-only afterwards.

use std::sync::Arc;

use secrecy::ExposeSecret;
use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::adapters::ai::{AzureOpenAIConfig, AzureOpenAIProvider};
use crate::adapters::http::WebhookAppState;
use crate::adapters::storage::InMemoryConversationStore;
use crate::adapters::tools::{
    RagSearchTool, RagSettings, SearchIndexTool, SearchSettings, RAG_SEARCH_TOOL,
    SEARCH_INDEX_TOOL,
};
use crate::adapters::whatsapp::{WhatsAppCloudConfig, WhatsAppCloudSender};
use crate::application::{ChatOrchestrator, GatewaySettings};
use crate::config::{AppConfig, ConfigError, LogFormat, ServerConfig, ValidationError};
use crate::domain::tools::ToolRegistry;
use crate::domain::webhook::PayloadSignatureVerifier;
use crate::ports::{AIError, ChatCompletion, ConversationStore, MessagingError, ToolError};

/// Startup failures.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("chat completion client: {0}")]
    Completion(#[from] AIError),

    #[error("messaging client: {0}")]
    Messaging(#[from] MessagingError),

    #[error("tool setup: {0}")]
    Tool(#[from] ToolError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads, validates and resolves the configuration.
pub fn load_config() -> Result<AppConfig, BootstrapError> {
    let mut config = AppConfig::load()?;
    config.validate()?;
    config.assistant = config.assistant.resolved()?;
    Ok(config)
}

/// Like [`load_config`] but without the messaging gateway requirements.
pub fn load_chat_config() -> Result<AppConfig, BootstrapError> {
    let mut config = AppConfig::load()?;
    config.validate_chat()?;
    config.assistant = config.assistant.resolved()?;
    Ok(config)
}

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` overrides the configured filter. Logs go to stderr so the
/// console keeps stdout for the conversation.
pub fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    match server.effective_log_format() {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

/// Builds the Azure OpenAI client.
pub fn build_completion(config: &AppConfig) -> Result<Arc<dyn ChatCompletion>, BootstrapError> {
    let openai = &config.openai;
    let endpoint = openai
        .endpoint
        .clone()
        .ok_or(ValidationError::MissingRequired("OPEN_AI_ENDPOINT"))?;
    let api_key = openai
        .api_key
        .as_ref()
        .map(|k| k.expose_secret().clone())
        .ok_or(ValidationError::MissingRequired("OPEN_AI_KEY"))?;
    let deployment = openai
        .chat_model
        .clone()
        .ok_or(ValidationError::MissingRequired("CHAT_MODEL"))?;

    let provider_config = AzureOpenAIConfig::new(endpoint, api_key, deployment)
        .with_api_version(openai.api_version.clone())
        .with_timeout(openai.timeout());

    Ok(Arc::new(AzureOpenAIProvider::new(provider_config)?))
}

/// Builds the tool registry from `features.enabled_tools`, in listed order.
pub fn build_registry(
    config: &AppConfig,
    completion: Arc<dyn ChatCompletion>,
) -> Result<ToolRegistry, BootstrapError> {
    let mut registry = ToolRegistry::new();

    for name in config.features.enabled_tools_list() {
        match name.as_str() {
            RAG_SEARCH_TOOL => registry.register(Arc::new(
                RagSearchTool::new(completion.clone(), RagSettings::from_config(config))
                    .with_system_prompt(config.assistant.system_prompt.clone()),
            )),
            SEARCH_INDEX_TOOL => registry.register(Arc::new(SearchIndexTool::new(
                SearchSettings::from_config(&config.search),
            )?)),
            _ => return Err(ValidationError::UnknownTool(name).into()),
        }
    }

    tracing::info!(tools = ?registry.names(), "Tool registry built");
    Ok(registry)
}

/// Builds the orchestrator around a completion client.
pub fn build_orchestrator(
    config: &AppConfig,
    completion: Arc<dyn ChatCompletion>,
) -> Result<ChatOrchestrator, BootstrapError> {
    let registry = build_registry(config, completion.clone())?;
    Ok(ChatOrchestrator::new(completion, Arc::new(registry))
        .with_temperature(config.assistant.temperature)
        .with_reply_timeout(config.server.reply_timeout()))
}

/// History store, present only when retention is enabled.
///
/// The caller owns the purge schedule; see `InMemoryConversationStore::spawn_purge_task`.
pub fn build_store(config: &AppConfig) -> Option<InMemoryConversationStore> {
    config
        .features
        .retain_history
        .then(|| InMemoryConversationStore::new(config.features.history_ttl()))
}

pub fn gateway_settings(config: &AppConfig) -> GatewaySettings {
    GatewaySettings {
        system_prompt: config.assistant.system_prompt.clone(),
        fallback_reply: config.assistant.fallback_reply.clone(),
        enable_status_filtering: config.features.enable_status_filtering,
    }
}

/// Assembles the HTTP state around an existing completion client.
pub fn build_state_with(
    config: &AppConfig,
    completion: Arc<dyn ChatCompletion>,
    store: Option<InMemoryConversationStore>,
) -> Result<WebhookAppState, BootstrapError> {
    let whatsapp = &config.whatsapp;
    let sender = WhatsAppCloudSender::new(WhatsAppCloudConfig::from_config(whatsapp)?)?;
    let verify_token = whatsapp
        .verify_token
        .clone()
        .ok_or(ValidationError::MissingRequired("VERIFY_TOKEN"))?;
    let signature_verifier = whatsapp
        .app_secret
        .as_ref()
        .filter(|_| whatsapp.verifies_signatures())
        .map(|secret| Arc::new(PayloadSignatureVerifier::new(secret.expose_secret())));

    Ok(WebhookAppState {
        orchestrator: build_orchestrator(config, completion)?,
        sender: Arc::new(sender),
        store: store.map(|store| Arc::new(store) as Arc<dyn ConversationStore>),
        settings: gateway_settings(config),
        verify_token,
        signature_verifier,
    })
}

/// Assembles the HTTP state with the Azure OpenAI client.
pub fn build_state(
    config: &AppConfig,
    store: Option<InMemoryConversationStore>,
) -> Result<WebhookAppState, BootstrapError> {
    let completion = build_completion(config)?;
    build_state_with(config, completion, store)
}
