//! WhatsApp Cloud API sender.
//!
//! Sends plain text replies through
//! `POST {graph_base_url}/{version}/{phone_number_id}/messages` with a bearer
//! token. One attempt per message.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::WhatsAppConfig;
use crate::ports::{MessageSender, MessagingError, SendReceipt};

/// Configuration for the Cloud API sender.
#[derive(Debug, Clone)]
pub struct WhatsAppCloudConfig {
    /// Graph API base URL.
    pub base_url: String,
    /// Graph API version segment (e.g., "v22.0").
    pub api_version: String,
    /// Sending phone number id.
    pub phone_number_id: String,
    access_token: Secret<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl WhatsAppCloudConfig {
    pub fn new(phone_number_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: "https://graph.facebook.com".to_string(),
            api_version: "v22.0".to_string(),
            phone_number_id: phone_number_id.into(),
            access_token: Secret::new(access_token.into()),
            timeout: Duration::from_secs(30),
        }
    }

    /// Builds the sender configuration from the loaded settings.
    pub fn from_config(config: &WhatsAppConfig) -> Result<Self, MessagingError> {
        let token = config
            .access_token
            .as_ref()
            .map(|t| t.expose_secret().clone())
            .filter(|t| !t.is_empty())
            .ok_or(MessagingError::NotConfigured("WHATSAPP_TOKEN"))?;
        let phone_number_id = config
            .phone_number_id
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or(MessagingError::NotConfigured("PHONE_NUMBER_ID"))?;

        Ok(Self::new(phone_number_id, token)
            .with_base_url(config.graph_base_url.clone())
            .with_api_version(config.graph_api_version.clone()))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/{}/{}/messages",
            self.base_url.trim_end_matches('/'),
            self.api_version,
            self.phone_number_id
        )
    }
}

/// Sender backed by the WhatsApp Cloud API.
pub struct WhatsAppCloudSender {
    config: WhatsAppCloudConfig,
    client: Client,
}

impl WhatsAppCloudSender {
    pub fn new(config: WhatsAppCloudConfig) -> Result<Self, MessagingError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MessagingError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl MessageSender for WhatsAppCloudSender {
    async fn send_text(&self, to: &str, body: &str) -> Result<SendReceipt, MessagingError> {
        let payload = OutboundTextMessage::new(to, body);

        let response = self
            .client
            .post(self.config.messages_url())
            .bearer_auth(self.config.access_token.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| MessagingError::network(e.to_string()))?;

        let status = response.status().as_u16();
        tracing::info!(status, to, "WhatsApp send response");

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MessagingError::Rejected { status, body });
        }

        let message_id = response
            .json::<SendResponse>()
            .await
            .ok()
            .and_then(|r| r.messages.into_iter().next())
            .map(|m| m.id);

        Ok(SendReceipt { status, message_id })
    }
}

// ----- Graph API Types -----

#[derive(Debug, Serialize)]
struct OutboundTextMessage<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: OutboundText<'a>,
}

impl<'a> OutboundTextMessage<'a> {
    fn new(to: &'a str, body: &'a str) -> Self {
        Self {
            messaging_product: "whatsapp",
            to,
            kind: "text",
            text: OutboundText { body },
        }
    }
}

#[derive(Debug, Serialize)]
struct OutboundText<'a> {
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    messages: Vec<SentMessage>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    id: String,
}
