//! Application layer - Orchestration and command handlers.
//!
//! This layer coordinates the domain rules with the ports: the chat
//! orchestrator runs one tool-calling round trip, and the handlers wrap it
//! for the webhook and direct-chat entry points.

mod chat_orchestrator;
pub mod handlers;

pub use chat_orchestrator::{ChatError, ChatOrchestrator};
pub use handlers::{
    ChatCommand, ChatCommandError, ChatHandler, ChatResult, GatewaySettings,
    HandleInboundMessageCommand, HandleInboundMessageHandler, HandleInboundMessageResult,
};
