//! Application handlers.
//!
//! Command handlers that drive the chat orchestrator for each entry point.

mod chat;
mod handle_inbound_message;
mod turn;

pub use chat::{ChatCommand, ChatCommandError, ChatHandler, ChatResult};
pub use handle_inbound_message::{
    GatewaySettings, HandleInboundMessageCommand, HandleInboundMessageHandler,
    HandleInboundMessageResult,
};
