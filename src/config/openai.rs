//! Azure OpenAI configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Azure OpenAI chat-completion configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: Option<String>,

    /// API key for the resource
    pub api_key: Option<SecretString>,

    /// Chat model deployment name
    pub chat_model: Option<String>,

    /// Embedding model deployment name used by vector search
    pub embedding_model: Option<String>,

    /// REST API version query parameter
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if the endpoint is configured
    pub fn has_endpoint(&self) -> bool {
        non_empty(self.endpoint.as_deref())
    }

    /// Check if the API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Check if a chat deployment is configured
    pub fn has_chat_model(&self) -> bool {
        non_empty(self.chat_model.as_deref())
    }

    /// Validate the values the orchestrator cannot run without
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_endpoint() {
            return Err(ValidationError::MissingRequired("OPEN_AI_ENDPOINT"));
        }
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("OPEN_AI_KEY"));
        }
        if !self.has_chat_model() {
            return Err(ValidationError::MissingRequired("CHAT_MODEL"));
        }
        if let Some(endpoint) = &self.endpoint {
            if !is_http_url(endpoint) {
                return Err(ValidationError::InvalidUrl("OPEN_AI_ENDPOINT"));
            }
        }
        Ok(())
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            chat_model: None,
            embedding_model: None,
            api_version: default_api_version(),
            timeout_secs: default_timeout(),
        }
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

pub(crate) fn is_http_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}

fn default_api_version() -> String {
    "2024-12-01-preview".to_string()
}

fn default_timeout() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> OpenAiConfig {
        OpenAiConfig {
            endpoint: Some("https://example.openai.azure.com".to_string()),
            api_key: Some(SecretString::new("key-123".to_string())),
            chat_model: Some("gpt-4o".to_string()),
            embedding_model: Some("text-embedding-ada-002".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_openai_config_defaults() {
        let config = OpenAiConfig::default();
        assert_eq!(config.api_version, "2024-12-01-preview");
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn test_validation_missing_key() {
        let config = OpenAiConfig {
            api_key: None,
            ..configured()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("OPEN_AI_KEY"))
        ));
    }

    #[test]
    fn test_validation_blank_chat_model() {
        let config = OpenAiConfig {
            chat_model: Some("  ".to_string()),
            ..configured()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("CHAT_MODEL"))
        ));
    }

    #[test]
    fn test_validation_rejects_non_http_endpoint() {
        let config = OpenAiConfig {
            endpoint: Some("example.openai.azure.com".to_string()),
            ..configured()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_debug_output_redacts_key() {
        let output = format!("{:?}", configured());
        assert!(!output.contains("key-123"));
    }
}
