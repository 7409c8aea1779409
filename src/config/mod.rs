//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `RAG_BOT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use whatsapp_rag_bot::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod assistant;
mod error;
mod features;
mod openai;
mod search;
mod server;
mod whatsapp;

pub use assistant::{
    AssistantConfig, InstructionMessages, InstructionsFile, DEFAULT_SYSTEM_PROMPT,
};
pub use error::{ConfigError, ValidationError};
pub use features::{FeatureFlags, KNOWN_TOOLS};
pub use openai::OpenAiConfig;
pub use search::SearchConfig;
pub use server::{Environment, LogFormat, ServerConfig};
pub use whatsapp::WhatsAppConfig;

use serde::Deserialize;

/// Unprefixed variable names accepted as fallbacks, with the key they fill.
///
/// These are the names reported in validation errors and tool output.
/// A `RAG_BOT__` variable for the same key takes precedence.
pub const PLAIN_ENV_NAMES: &[(&str, &str)] = &[
    ("OPEN_AI_ENDPOINT", "openai.endpoint"),
    ("OPEN_AI_KEY", "openai.api_key"),
    ("CHAT_MODEL", "openai.chat_model"),
    ("EMBEDDING_MODEL", "openai.embedding_model"),
    ("SEARCH_ENDPOINT", "search.endpoint"),
    ("SEARCH_KEY", "search.api_key"),
    ("INDEX_NAME", "search.index_name"),
    ("WHATSAPP_TOKEN", "whatsapp.access_token"),
    ("PHONE_NUMBER_ID", "whatsapp.phone_number_id"),
    ("VERIFY_TOKEN", "whatsapp.verify_token"),
];

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Azure OpenAI configuration
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Azure AI Search configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// WhatsApp Cloud API configuration
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Assistant persona
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `RAG_BOT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// The unprefixed names in [`PLAIN_ENV_NAMES`] (for example `OPEN_AI_KEY`)
    /// are read as fallbacks for their keys.
    ///
    /// # Environment Variable Format
    ///
    /// - `RAG_BOT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `RAG_BOT__OPENAI__CHAT_MODEL=gpt-4o` -> `openai.chat_model = gpt-4o`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    /// Missing values are reported by [`AppConfig::validate()`].
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        for (var, key) in PLAIN_ENV_NAMES {
            if let Ok(value) = std::env::var(var) {
                builder = builder.set_default(*key, value)?;
            }
        }

        let config = builder
            .add_source(
                config::Environment::default()
                    .prefix("RAG_BOT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Search settings are not checked here; the retrieval tools report
    /// missing search values as tool output.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_chat()?;
        self.whatsapp.validate()?;
        Ok(())
    }

    /// Validate only what the chat round trip needs (no messaging gateway).
    ///
    /// Used by the interactive console.
    pub fn validate_chat(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.openai.validate()?;
        self.assistant.validate()?;
        self.features.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
