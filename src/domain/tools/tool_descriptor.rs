//! Tool descriptor - schema and metadata for a tool.

use serde::{Deserialize, Serialize};

/// Definition of a tool that the model can invoke.
///
/// # Examples
///
/// ```ignore
/// use whatsapp_rag_bot::domain::tools::ToolDescriptor;
///
/// let descriptor = ToolDescriptor::new(
///     "search_index",
///     "Keyword search over the travel knowledge base",
///     serde_json::json!({
///         "type": "object",
///         "required": ["query"],
///         "properties": {
///             "query": { "type": "string", "description": "Search terms" }
///         }
///     }),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique name of the tool (e.g., "rag_search")
    name: String,

    /// Human-readable description shown to the model
    description: String,

    /// JSON Schema for the parameters
    parameters_schema: serde_json::Value,
}

impl ToolDescriptor {
    /// Creates a new tool descriptor.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters_schema,
        }
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameters schema.
    pub fn parameters_schema(&self) -> &serde_json::Value {
        &self.parameters_schema
    }

    /// Converts to OpenAI tool format.
    pub fn to_openai_format(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters_schema
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_params_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "required": ["query"],
            "properties": {
                "query": { "type": "string" }
            }
        })
    }

    #[test]
    fn new_creates_descriptor() {
        let def = ToolDescriptor::new("rag_search", "Search documents", sample_params_schema());

        assert_eq!(def.name(), "rag_search");
        assert_eq!(def.description(), "Search documents");
        assert_eq!(def.parameters_schema()["required"][0], "query");
    }

    #[test]
    fn to_openai_format_has_correct_structure() {
        let def = ToolDescriptor::new("rag_search", "Search documents", sample_params_schema());

        let openai = def.to_openai_format();

        assert_eq!(openai["type"], "function");
        assert_eq!(openai["function"]["name"], "rag_search");
        assert_eq!(openai["function"]["description"], "Search documents");
        assert!(openai["function"]["parameters"].is_object());
    }
}
