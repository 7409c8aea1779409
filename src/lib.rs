//! WhatsApp RAG Bot - Customer-support chat over WhatsApp
//!
//! Inbound webhook messages are answered through an Azure OpenAI tool-calling
//! round trip grounded on an Azure AI Search index, and replies are relayed
//! through the WhatsApp Cloud API.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
