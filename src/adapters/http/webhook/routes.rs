//! Axum router configuration for the webhook endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{chat, health, receive_webhook, verify_webhook, WebhookAppState};

/// Create the webhook router.
///
/// # Routes
/// - `GET /webhook` - Subscription handshake
/// - `POST /webhook` - Inbound message delivery
/// - `POST /chat` - Direct question and answer
/// - `GET /health` - Liveness check
pub fn webhook_router() -> Router<WebhookAppState> {
    messaging_routes().merge(api_routes())
}

/// Routes called by the messaging provider.
///
/// Every delivery ends in an acknowledgement, so these routes must not sit
/// behind a request timeout; the turn itself is bounded by the orchestrator.
pub fn messaging_routes() -> Router<WebhookAppState> {
    Router::new().route("/webhook", get(verify_webhook).post(receive_webhook))
}

/// Direct chat and liveness routes.
pub fn api_routes() -> Router<WebhookAppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockChatCompletion;
    use crate::adapters::whatsapp::RecordingSender;
    use crate::application::{ChatOrchestrator, GatewaySettings};
    use crate::domain::tools::ToolRegistry;
    use crate::domain::webhook::{PayloadSignatureVerifier, SIGNATURE_HEADER};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use secrecy::SecretString;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    // ───────────────────────────────────────────────────────────────
    // Test helpers
    // ───────────────────────────────────────────────────────────────

    struct TestApp {
        router: Router,
        completion: Arc<MockChatCompletion>,
        sender: Arc<RecordingSender>,
    }

    fn test_app(completion: MockChatCompletion, app_secret: Option<&str>) -> TestApp {
        let completion = Arc::new(completion);
        let sender = Arc::new(RecordingSender::new());
        let state = WebhookAppState {
            orchestrator: ChatOrchestrator::new(completion.clone(), Arc::new(ToolRegistry::new())),
            sender: sender.clone(),
            store: None,
            settings: GatewaySettings::default(),
            verify_token: SecretString::new("verify-me".to_string()),
            signature_verifier: app_secret.map(|s| Arc::new(PayloadSignatureVerifier::new(s))),
        };

        TestApp {
            router: webhook_router().with_state(state),
            completion,
            sender,
        }
    }

    fn text_payload() -> Value {
        json!({
            "entry": [{
                "changes": [{
                    "value": {
                        "messages": [{
                            "from": "15550001",
                            "type": "text",
                            "text": {"body": "Hello"}
                        }]
                    }
                }]
            }]
        })
    }

    fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    // ───────────────────────────────────────────────────────────────
    // GET /webhook
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn verification_echoes_challenge() {
        let app = test_app(MockChatCompletion::new(), None);

        let response = app
            .router
            .oneshot(
                Request::builder()
                    .uri("/webhook?hub.mode=subscribe&hub.verify_token=verify-me&hub.challenge=1158201444")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/plain"
        );
        assert_eq!(body_string(response).await, "1158201444");
    }

    #[tokio::test]
    async fn verification_with_wrong_token_is_forbidden() {
        let app = test_app(MockChatCompletion::new(), None);

        let response = app
            .router
            .oneshot(
                Request::builder()
                    .uri("/webhook?hub.mode=subscribe&hub.verify_token=wrong&hub.challenge=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_string(response).await, "Forbidden");
    }

    #[tokio::test]
    async fn verification_without_params_is_forbidden() {
        let app = test_app(MockChatCompletion::new(), None);

        let response = app
            .router
            .oneshot(Request::builder().uri("/webhook").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    // ───────────────────────────────────────────────────────────────
    // POST /webhook
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn text_message_is_answered() {
        let app = test_app(MockChatCompletion::new().with_reply("Hi there"), None);

        let response = app
            .router
            .oneshot(post("/webhook", text_payload().to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "ok"}));
        assert_eq!(app.sender.sent()[0].to, "15550001");
        assert_eq!(app.sender.sent()[0].body, "Hi there");
    }

    #[tokio::test]
    async fn invalid_json_is_ignored() {
        let app = test_app(MockChatCompletion::new(), None);

        let response = app
            .router
            .oneshot(post("/webhook", "not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "ignored"}));
        assert_eq!(app.completion.call_count(), 0);
    }

    #[tokio::test]
    async fn non_text_message_is_ignored() {
        let app = test_app(MockChatCompletion::new(), None);
        let payload = json!({
            "entry": [{"changes": [{"value": {"messages": [{"from": "1", "type": "image"}]}}]}]
        });

        let response = app
            .router
            .oneshot(post("/webhook", payload.to_string()))
            .await
            .unwrap();

        assert_eq!(body_json(response).await, json!({"status": "ignored"}));
        assert_eq!(app.sender.sent_count(), 0);
    }

    #[tokio::test]
    async fn signed_payload_is_accepted() {
        let app = test_app(MockChatCompletion::new().with_reply("ok"), Some("app-secret"));
        let body = text_payload().to_string();
        let signature = PayloadSignatureVerifier::new("app-secret").sign(body.as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header(SIGNATURE_HEADER, signature)
            .body(Body::from(body))
            .unwrap();
        let response = app.router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(app.sender.sent_count(), 1);
    }

    #[tokio::test]
    async fn bad_signature_is_unauthorized() {
        let app = test_app(MockChatCompletion::new(), Some("app-secret"));

        let request = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header(SIGNATURE_HEADER, "sha256=deadbeef")
            .body(Body::from(text_payload().to_string()))
            .unwrap();
        let response = app.router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(app.completion.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_signature_is_unauthorized() {
        let app = test_app(MockChatCompletion::new(), Some("app-secret"));

        let response = app
            .router
            .oneshot(post("/webhook", text_payload().to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // ───────────────────────────────────────────────────────────────
    // POST /chat and GET /health
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn chat_returns_reply() {
        let app = test_app(MockChatCompletion::new().with_reply("Three hotels."), None);

        let response = app
            .router
            .oneshot(post(
                "/chat",
                json!({"text": "Hotels?", "chat_id": "c-1"}).to_string(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"chat_id": "c-1", "reply": "Three hotels."})
        );
    }

    #[tokio::test]
    async fn chat_with_empty_text_is_bad_request() {
        let app = test_app(MockChatCompletion::new(), None);

        let response = app
            .router
            .oneshot(post("/chat", json!({"text": " ", "chat_id": "c-1"}).to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error_code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn chat_without_chat_id_is_json_error() {
        let app = test_app(MockChatCompletion::new(), None);

        let response = app
            .router
            .oneshot(post("/chat", json!({"text": "Hotels?"}).to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error_code"], "INVALID_REQUEST");
        assert_eq!(app.completion.call_count(), 0);
    }

    #[tokio::test]
    async fn chat_with_broken_json_is_json_error() {
        let app = test_app(MockChatCompletion::new(), None);

        let response = app
            .router
            .oneshot(post("/chat", "{\"text\": "))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error_code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn chat_past_reply_deadline_is_gateway_timeout() {
        let completion = MockChatCompletion::new()
            .with_reply("late")
            .with_delay(Duration::from_millis(300));
        let state = WebhookAppState {
            orchestrator: ChatOrchestrator::new(Arc::new(completion), Arc::new(ToolRegistry::new()))
                .with_reply_timeout(Duration::from_millis(50)),
            sender: Arc::new(RecordingSender::new()),
            store: None,
            settings: GatewaySettings::default(),
            verify_token: SecretString::new("verify-me".to_string()),
            signature_verifier: None,
        };

        let response = webhook_router()
            .with_state(state)
            .oneshot(post("/chat", json!({"text": "Hi", "chat_id": "c-1"}).to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body_json(response).await["error_code"], "UPSTREAM_TIMEOUT");
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = test_app(MockChatCompletion::new(), None);

        let response = app
            .router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "ok"}));
    }
}
