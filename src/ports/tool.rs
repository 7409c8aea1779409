//! Tool Port - Interface for capabilities the model may invoke.
//!
//! A tool pairs an immutable [`ToolDescriptor`] (what the model sees) with an
//! async invocation that turns decoded JSON arguments into text. Tools report
//! failures through [`ToolError`]; the registry converts those into tagged
//! strings so that a failing tool never aborts the chat round trip.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoTool { descriptor: ToolDescriptor }
//!
//! #[async_trait]
//! impl Tool for EchoTool {
//!     fn descriptor(&self) -> &ToolDescriptor {
//!         &self.descriptor
//!     }
//!
//!     async fn invoke(&self, args: serde_json::Value) -> Result<String, ToolError> {
//!         Ok(args.to_string())
//!     }
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::tools::ToolDescriptor;

/// Port for a single invocable tool.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and parameter schema advertised to the model.
    fn descriptor(&self) -> &ToolDescriptor;

    /// Execute the tool with decoded arguments.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Text handed back to the model as the tool message
    /// * `Err(ToolError)` - The invocation could not produce output
    async fn invoke(&self, args: serde_json::Value) -> Result<String, ToolError>;
}

/// Errors that can occur during tool invocation.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    /// Arguments were not the expected shape
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// A required argument was absent
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// An external service failed
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Unexpected internal failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Creates an invalid arguments error.
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments(message.into())
    }

    /// Creates an upstream error.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

/// Extracts a required string argument.
pub fn required_str<'a>(
    args: &'a serde_json::Value,
    name: &'static str,
) -> Result<&'a str, ToolError> {
    match args.get(name) {
        None | Some(serde_json::Value::Null) => Err(ToolError::MissingArgument(name)),
        Some(value) => value
            .as_str()
            .ok_or_else(|| ToolError::invalid_arguments(format!("'{}' must be a string", name))),
    }
}

/// Extracts an optional string argument.
pub fn optional_str<'a>(
    args: &'a serde_json::Value,
    name: &'static str,
) -> Result<Option<&'a str>, ToolError> {
    match args.get(name) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| ToolError::invalid_arguments(format!("'{}' must be a string", name))),
    }
}
