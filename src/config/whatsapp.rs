//! WhatsApp Cloud API configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::openai::{is_http_url, non_empty};

/// WhatsApp Cloud API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppConfig {
    /// Bearer token for the Graph API
    pub access_token: Option<SecretString>,

    /// Sending phone number id
    pub phone_number_id: Option<String>,

    /// Secret echoed back during the subscription handshake
    pub verify_token: Option<SecretString>,

    /// App secret used to sign webhook payloads (`X-Hub-Signature-256`).
    /// Signature checks are skipped when unset.
    pub app_secret: Option<SecretString>,

    /// Graph API base URL
    #[serde(default = "default_graph_base_url")]
    pub graph_base_url: String,

    /// Graph API version path segment
    #[serde(default = "default_graph_api_version")]
    pub graph_api_version: String,
}

impl WhatsAppConfig {
    /// Check if signature verification is enabled
    pub fn verifies_signatures(&self) -> bool {
        self.app_secret
            .as_ref()
            .is_some_and(|s| !s.expose_secret().is_empty())
    }

    /// Validate WhatsApp configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self
            .access_token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().is_empty())
        {
            return Err(ValidationError::MissingRequired("WHATSAPP_TOKEN"));
        }
        if !non_empty(self.phone_number_id.as_deref()) {
            return Err(ValidationError::MissingRequired("PHONE_NUMBER_ID"));
        }
        if !self
            .verify_token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().is_empty())
        {
            return Err(ValidationError::MissingRequired("VERIFY_TOKEN"));
        }
        if !is_http_url(&self.graph_base_url) {
            return Err(ValidationError::InvalidUrl("GRAPH_BASE_URL"));
        }
        Ok(())
    }
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            phone_number_id: None,
            verify_token: None,
            app_secret: None,
            graph_base_url: default_graph_base_url(),
            graph_api_version: default_graph_api_version(),
        }
    }
}

fn default_graph_base_url() -> String {
    "https://graph.facebook.com".to_string()
}

fn default_graph_api_version() -> String {
    "v22.0".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> WhatsAppConfig {
        WhatsAppConfig {
            access_token: Some(SecretString::new("EAAG-token".to_string())),
            phone_number_id: Some("1234567890".to_string()),
            verify_token: Some(SecretString::new("verify-me".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_whatsapp_defaults() {
        let config = WhatsAppConfig::default();
        assert_eq!(config.graph_base_url, "https://graph.facebook.com");
        assert_eq!(config.graph_api_version, "v22.0");
        assert!(!config.verifies_signatures());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn test_validation_missing_verify_token() {
        let config = WhatsAppConfig {
            verify_token: None,
            ..configured()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("VERIFY_TOKEN"))
        ));
    }

    #[test]
    fn test_validation_missing_phone_number() {
        let config = WhatsAppConfig {
            phone_number_id: Some(String::new()),
            ..configured()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("PHONE_NUMBER_ID"))
        ));
    }

    #[test]
    fn test_app_secret_enables_signatures() {
        let config = WhatsAppConfig {
            app_secret: Some(SecretString::new("app-secret".to_string())),
            ..configured()
        };
        assert!(config.verifies_signatures());
    }
}
