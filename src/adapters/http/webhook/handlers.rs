//! HTTP handlers for the messaging webhook.
//!
//! These handlers connect Axum routes to the application layer handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::application::{
    ChatCommand, ChatCommandError, ChatError, ChatHandler, ChatOrchestrator, GatewaySettings,
    HandleInboundMessageCommand, HandleInboundMessageHandler,
};
use crate::domain::webhook::{
    verify_subscription, PayloadSignatureVerifier, SignatureError, VerificationOutcome,
    SIGNATURE_HEADER,
};
use crate::ports::{ConversationStore, MessageSender};

use super::dto::{ChatRequest, ChatResponse, ErrorResponse, StatusResponse, VerificationParams};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the webhook endpoints.
///
/// Cloned for each request; dependencies are Arc-wrapped.
#[derive(Clone)]
pub struct WebhookAppState {
    pub orchestrator: ChatOrchestrator,
    pub sender: Arc<dyn MessageSender>,
    pub store: Option<Arc<dyn ConversationStore>>,
    pub settings: GatewaySettings,
    pub verify_token: SecretString,
    /// Present when payload signatures are checked.
    pub signature_verifier: Option<Arc<PayloadSignatureVerifier>>,
}

impl WebhookAppState {
    pub fn inbound_handler(&self) -> HandleInboundMessageHandler {
        HandleInboundMessageHandler::new(
            self.orchestrator.clone(),
            self.sender.clone(),
            self.store.clone(),
            self.settings.clone(),
        )
    }

    pub fn chat_handler(&self) -> ChatHandler {
        ChatHandler::new(
            self.orchestrator.clone(),
            self.store.clone(),
            self.settings.system_prompt.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /webhook - Subscription handshake
pub async fn verify_webhook(
    State(state): State<WebhookAppState>,
    Query(params): Query<VerificationParams>,
) -> Response {
    let outcome = verify_subscription(
        params.mode.as_deref(),
        params.verify_token.as_deref(),
        params.challenge.as_deref(),
        state.verify_token.expose_secret(),
    );

    match outcome {
        VerificationOutcome::Verified { challenge } => {
            tracing::info!("Webhook subscription verified");
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain")],
                challenge,
            )
                .into_response()
        }
        VerificationOutcome::Forbidden => {
            tracing::warn!(mode = ?params.mode, "Webhook verification refused");
            (StatusCode::FORBIDDEN, "Forbidden").into_response()
        }
    }
}

/// POST /webhook - Inbound message delivery
pub async fn receive_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<StatusResponse>, GatewayError> {
    if let Some(verifier) = &state.signature_verifier {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok());
        verifier.verify(&body, signature)?;
    }

    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "Webhook body is not JSON");
            return Ok(Json(StatusResponse::ignored()));
        }
    };

    let result = state
        .inbound_handler()
        .handle(HandleInboundMessageCommand::new(payload))
        .await;

    Ok(Json(StatusResponse::from(&result)))
}

/// POST /chat - Direct question and answer
pub async fn chat(
    State(state): State<WebhookAppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, GatewayError> {
    let Json(request) = payload?;
    let result = state
        .chat_handler()
        .handle(ChatCommand::new(request.chat_id, request.text))
        .await?;

    Ok(Json(ChatResponse::from(result)))
}

/// GET /health - Liveness check
pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Errors surfaced by the gateway endpoints.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid webhook signature: {0}")]
    InvalidSignature(#[from] SignatureError),

    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error(transparent)]
    Chat(#[from] ChatCommandError),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            GatewayError::InvalidSignature(_) => {
                (StatusCode::UNAUTHORIZED, "INVALID_WEBHOOK_SIGNATURE")
            }
            GatewayError::InvalidBody(rejection) => (rejection.status(), "INVALID_REQUEST"),
            GatewayError::Chat(ChatCommandError::EmptyText) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
            }
            GatewayError::Chat(ChatCommandError::Chat(ChatError::TimedOut(_))) => {
                (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT")
            }
            GatewayError::Chat(ChatCommandError::Chat(_)) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
            }
        };

        tracing::warn!(error = %self, status = status.as_u16(), "Gateway request failed");

        let body = ErrorResponse::new(error_code, self.to_string());
        (status, Json(body)).into_response()
    }
}
