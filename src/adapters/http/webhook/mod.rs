//! HTTP adapter for the messaging gateway.
//!
//! - `GET /webhook` - Subscription handshake
//! - `POST /webhook` - Inbound message delivery
//! - `POST /chat` - Direct question and answer
//! - `GET /health` - Liveness check

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{GatewayError, WebhookAppState};
pub use routes::{api_routes, messaging_routes, webhook_router};
