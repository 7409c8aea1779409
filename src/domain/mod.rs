//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (errors, state machine trait)
//! - `conversation` - Chat messages, tool calls and the transcript
//! - `tools` - Tool descriptors and the dispatching registry
//! - `orchestrator` - Round-trip state machine and tool-result bookkeeping
//! - `webhook` - Inbound payload classification and verification

pub mod conversation;
pub mod foundation;
pub mod orchestrator;
pub mod tools;
pub mod webhook;
