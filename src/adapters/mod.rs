//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Azure OpenAI chat completions (plus a scripted mock)
//! - `tools` - Retrieval tools over Azure AI Search
//! - `whatsapp` - WhatsApp Cloud API sender
//! - `storage` - In-memory conversation history
//! - `http` - Webhook, chat and health endpoints

pub mod ai;
pub mod http;
pub mod storage;
pub mod tools;
pub mod whatsapp;
