//! Chat Completion Adapters.
//!
//! ## Available Adapters
//!
//! - `AzureOpenAIProvider` - Azure-hosted OpenAI chat deployments
//! - `MockChatCompletion` - Scripted mock for testing

mod azure_openai_provider;
mod mock_provider;

pub use azure_openai_provider::{AzureOpenAIConfig, AzureOpenAIProvider};
pub use mock_provider::{MockChatCompletion, MockError, MockResponse};
