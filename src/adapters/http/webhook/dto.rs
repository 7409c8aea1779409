//! Data transfer objects for the webhook HTTP endpoints.

use serde::{Deserialize, Serialize};

use crate::application::{ChatResult, HandleInboundMessageResult};

// ═══════════════════════════════════════════════════════════════════════════
// Request DTOs
// ═══════════════════════════════════════════════════════════════════════════

/// Query parameters of the subscription handshake.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerificationParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Direct chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub text: String,
    /// Conversation key chosen by the caller
    pub chat_id: String,
}

// ═══════════════════════════════════════════════════════════════════════════
// Response DTOs
// ═══════════════════════════════════════════════════════════════════════════

/// Acknowledgement body for webhook deliveries and health checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }

    pub fn ignored() -> Self {
        Self {
            status: "ignored".to_string(),
        }
    }
}

impl From<&HandleInboundMessageResult> for StatusResponse {
    fn from(result: &HandleInboundMessageResult) -> Self {
        if result.is_ignored() {
            Self::ignored()
        } else {
            Self::ok()
        }
    }
}

/// Direct chat reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub chat_id: String,
    pub reply: String,
}

impl From<ChatResult> for ChatResponse {
    fn from(result: ChatResult) -> Self {
        Self {
            chat_id: result.chat_id,
            reply: result.reply,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::webhook::IgnoreReason;

    #[test]
    fn verification_params_use_hub_names() {
        let params: VerificationParams = serde_json::from_value(serde_json::json!({
            "hub.mode": "subscribe",
            "hub.verify_token": "secret",
            "hub.challenge": "1158201444"
        }))
        .unwrap();

        assert_eq!(params.mode.as_deref(), Some("subscribe"));
        assert_eq!(params.verify_token.as_deref(), Some("secret"));
        assert_eq!(params.challenge.as_deref(), Some("1158201444"));
    }

    #[test]
    fn status_follows_handler_result() {
        let ignored = HandleInboundMessageResult::Ignored(IgnoreReason::NonText);
        assert_eq!(StatusResponse::from(&ignored), StatusResponse::ignored());

        let replied = HandleInboundMessageResult::Replied {
            to: "1".to_string(),
            reply: "hi".to_string(),
            delivered: false,
        };
        assert_eq!(StatusResponse::from(&replied), StatusResponse::ok());
    }
}
