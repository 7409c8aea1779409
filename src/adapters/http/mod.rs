//! HTTP adapters - the public surface of the bot.

pub mod webhook;

use std::time::Duration;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use webhook::{api_routes, messaging_routes, webhook_router, GatewayError, WebhookAppState};

/// Builds the application router with request tracing and request ids.
///
/// `request_timeout` applies to `/chat` and `/health` only. Webhook
/// deliveries are bounded by the orchestrator's reply deadline instead, so
/// the provider always gets its acknowledgement.
pub fn app_router(state: WebhookAppState, request_timeout: Duration) -> Router {
    let api = api_routes().layer(TimeoutLayer::new(request_timeout));

    messaging_routes().merge(api).with_state(state).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http()),
    )
}
