//! Tools the model may invoke during a chat round trip.
//!
//! - [`ToolDescriptor`] - Schema and metadata advertised to the model
//! - [`ToolRegistry`] - Ordered lookup and dispatch of registered tools

mod tool_descriptor;
mod tool_registry;

pub use tool_descriptor::ToolDescriptor;
pub use tool_registry::ToolRegistry;
