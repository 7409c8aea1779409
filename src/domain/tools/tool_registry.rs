//! Tool Registry - Ordered set of tools exposed to the model.
//!
//! The registry is built once at startup and shared read-only. Dispatch never
//! fails: unknown tools, undecodable arguments, and tool faults all become
//! tagged text that is handed back to the model as the tool result.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = ToolRegistry::new();
//! registry.register(Arc::new(RagSearchTool::new(provider, settings)));
//!
//! let result = registry.dispatch(&call).await;
//! conversation.push(result.into());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::conversation::{ToolCallRequest, ToolResult};
use crate::ports::Tool;

use super::ToolDescriptor;

/// Registry of invocable tools, in registration order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    /// Registered tools in order
    tools: Vec<Arc<dyn Tool>>,

    /// Position of each tool by name
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Creates a new empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool. A tool with the same name replaces the earlier one
    /// in place.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.descriptor().name().to_string();
        match self.index.get(&name) {
            Some(&position) => self.tools[position] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Builder-style registration.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    /// Gets a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index.get(name).map(|&position| &self.tools[position])
    }

    /// Checks if a tool is registered.
    pub fn has_tool(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns descriptors in registration order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor().clone()).collect()
    }

    /// Converts all tools to OpenAI function format.
    pub fn to_openai_tools(&self) -> Vec<serde_json::Value> {
        self.tools
            .iter()
            .map(|t| t.descriptor().to_openai_format())
            .collect()
    }

    /// Returns all registered tool names in order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.descriptor().name()).collect()
    }

    /// Returns the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invokes the tool named by the call and returns its result.
    pub async fn dispatch(&self, call: &ToolCallRequest) -> ToolResult {
        let Some(tool) = self.get(&call.name) else {
            tracing::warn!(tool = %call.name, call_id = %call.id, "Unknown tool requested");
            return ToolResult::new(&call.id, format!("[TOOL] Unknown tool: {}", call.name));
        };

        let args = match call.parse_arguments() {
            Ok(args) => args,
            Err(e) => {
                tracing::warn!(
                    tool = %call.name,
                    call_id = %call.id,
                    error = %e,
                    "Tool arguments could not be decoded"
                );
                return ToolResult::new(
                    &call.id,
                    format!("[TOOL] {} failed: invalid arguments: {}", call.name, e),
                );
            }
        };

        tracing::info!(tool = %call.name, call_id = %call.id, "Executing tool");

        match tool.invoke(args).await {
            Ok(output) => ToolResult::new(&call.id, output),
            Err(e) => {
                tracing::warn!(tool = %call.name, call_id = %call.id, error = %e, "Tool failed");
                ToolResult::new(&call.id, format!("[TOOL] {} failed: {}", call.name, e))
            }
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{required_str, ToolError};
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoTool {
        descriptor: ToolDescriptor,
    }

    impl EchoTool {
        fn named(name: &str) -> Self {
            Self {
                descriptor: ToolDescriptor::new(
                    name,
                    format!("Description for {}", name),
                    json!({"type": "object", "properties": {"text": {"type": "string"}}}),
                ),
            }
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn descriptor(&self) -> &ToolDescriptor {
            &self.descriptor
        }

        async fn invoke(&self, args: serde_json::Value) -> Result<String, ToolError> {
            Ok(format!("echo: {}", required_str(&args, "text")?))
        }
    }

    struct FailingTool {
        descriptor: ToolDescriptor,
    }

    #[async_trait]
    impl Tool for FailingTool {
        fn descriptor(&self) -> &ToolDescriptor {
            &self.descriptor
        }

        async fn invoke(&self, _args: serde_json::Value) -> Result<String, ToolError> {
            Err(ToolError::upstream("service down"))
        }
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::new()
            .with_tool(Arc::new(EchoTool::named("echo")))
            .with_tool(Arc::new(FailingTool {
                descriptor: ToolDescriptor::new("broken", "Always fails", json!({})),
            }))
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.to_openai_tools().is_empty());
    }

    #[test]
    fn preserves_registration_order() {
        let registry = ToolRegistry::new()
            .with_tool(Arc::new(EchoTool::named("zeta")))
            .with_tool(Arc::new(EchoTool::named("alpha")));

        assert_eq!(registry.names(), vec!["zeta", "alpha"]);
        assert_eq!(registry.descriptors()[1].name(), "alpha");
    }

    #[test]
    fn duplicate_name_replaces_in_place() {
        let registry = ToolRegistry::new()
            .with_tool(Arc::new(EchoTool::named("echo")))
            .with_tool(Arc::new(EchoTool::named("other")))
            .with_tool(Arc::new(EchoTool::named("echo")));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["echo", "other"]);
    }

    #[test]
    fn to_openai_tools_returns_formatted_tools() {
        let tools = registry().to_openai_tools();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0]["type"], "function");
        assert_eq!(tools[0]["function"]["name"], "echo");
    }

    #[tokio::test]
    async fn dispatch_returns_tool_output() {
        let call = ToolCallRequest::new("call_1", "echo", r#"{"text":"hi"}"#);
        let result = registry().dispatch(&call).await;

        assert_eq!(result.call_id, "call_1");
        assert_eq!(result.content, "echo: hi");
    }

    #[tokio::test]
    async fn dispatch_unknown_tool_is_tagged() {
        let call = ToolCallRequest::new("call_2", "teleport", "{}");
        let result = registry().dispatch(&call).await;

        assert_eq!(result.call_id, "call_2");
        assert_eq!(result.content, "[TOOL] Unknown tool: teleport");
    }

    #[tokio::test]
    async fn dispatch_invalid_arguments_is_tagged() {
        let call = ToolCallRequest::new("call_3", "echo", "{oops");
        let result = registry().dispatch(&call).await;

        assert!(result
            .content
            .starts_with("[TOOL] echo failed: invalid arguments:"));
    }

    #[tokio::test]
    async fn dispatch_tool_error_is_tagged() {
        let call = ToolCallRequest::new("call_4", "broken", "{}");
        let result = registry().dispatch(&call).await;

        assert_eq!(
            result.content,
            "[TOOL] broken failed: upstream error: service down"
        );
    }

    #[tokio::test]
    async fn dispatch_missing_argument_is_tagged() {
        let call = ToolCallRequest::new("call_5", "echo", "{}");
        let result = registry().dispatch(&call).await;

        assert_eq!(
            result.content,
            "[TOOL] echo failed: missing required argument: text"
        );
    }
}
