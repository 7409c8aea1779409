//! Keyword search tool over an Azure AI Search index.
//!
//! Unlike `rag_search`, this tool does not ask the model anything. It runs a
//! simple keyword query against the index and hands the hits back as a short
//! context block the model can ground its answer on.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::time::Duration;

use crate::config::SearchConfig;
use crate::domain::tools::ToolDescriptor;
use crate::ports::{required_str, Tool, ToolError};

/// Tool name advertised to the model.
pub const SEARCH_INDEX_TOOL: &str = "search_index";

/// Longest snippet kept per hit, in characters.
pub const MAX_SNIPPET_CHARS: usize = 300;

const MISSING_CONFIGURATION: &str =
    "[RAG] Missing search configuration. Please set SEARCH_ENDPOINT, SEARCH_KEY, INDEX_NAME.";
const NO_RESULTS: &str = "[RAG] No relevant documents found in the index.";
const CONTEXT_HEADER: &str = "[RAG] Retrieved context from Margie's Travel knowledge base:";

/// Connection values for the search index.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub endpoint: Option<String>,
    pub api_key: Option<SecretString>,
    pub index_name: Option<String>,
    pub api_version: String,
    pub top: u32,
    pub timeout: Duration,
}

impl SearchSettings {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            index_name: config.index_name.clone(),
            api_version: config.api_version.clone(),
            top: config.top,
            timeout: Duration::from_secs(30),
        }
    }

    /// Returns `(endpoint, key, index)` when all three are present and non-empty.
    fn complete(&self) -> Option<(&str, &str, &str)> {
        let endpoint = self.endpoint.as_deref().filter(|v| !v.trim().is_empty())?;
        let key = self
            .api_key
            .as_ref()
            .map(|k| k.expose_secret().as_str())
            .filter(|v| !v.trim().is_empty())?;
        let index = self.index_name.as_deref().filter(|v| !v.trim().is_empty())?;
        Some((endpoint, key, index))
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

/// `search_index` tool: keyword lookup returning formatted context lines.
pub struct SearchIndexTool {
    descriptor: ToolDescriptor,
    settings: SearchSettings,
    client: Client,
}

impl SearchIndexTool {
    pub fn new(settings: SearchSettings) -> Result<Self, ToolError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ToolError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            descriptor: descriptor(),
            settings,
            client,
        })
    }

    async fn search(&self, query: &str) -> Result<Vec<Map<String, Value>>, reqwest::Error> {
        let Some((endpoint, key, index)) = self.settings.complete() else {
            return Ok(Vec::new());
        };

        let url = format!(
            "{}/indexes/{}/docs/search",
            endpoint.trim_end_matches('/'),
            index
        );
        let body = SearchRequest {
            search: query,
            top: self.settings.top,
            query_type: "simple",
            select: "*",
        };

        let response = self
            .client
            .post(url)
            .query(&[("api-version", self.settings.api_version.as_str())])
            .header("api-key", key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!(status = %response.status(), index, "Search index responded");

        let parsed: SearchResponse = response.json().await?;
        Ok(parsed.value)
    }
}

#[async_trait]
impl Tool for SearchIndexTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, args: Value) -> Result<String, ToolError> {
        let query = required_str(&args, "query")?;

        if self.settings.complete().is_none() {
            return Ok(MISSING_CONFIGURATION.to_string());
        }

        match self.search(query).await {
            Ok(hits) => Ok(format_hits(&hits)),
            Err(e) => {
                tracing::warn!(tool = SEARCH_INDEX_TOOL, error = %e, "Search index query failed");
                Ok(format!("[RAG] Error querying search index: {}", e))
            }
        }
    }
}

/// Renders hits as a header line followed by one bullet per document.
pub fn format_hits(hits: &[Map<String, Value>]) -> String {
    if hits.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut lines = Vec::with_capacity(hits.len() + 1);
    lines.push(CONTEXT_HEADER.to_string());

    for (i, doc) in hits.iter().enumerate() {
        let title = first_text(doc, &["title", "hotel_name", "name"])
            .map(str::to_string)
            .unwrap_or_else(|| format!("Document {}", i + 1));
        let snippet = truncate_snippet(
            first_text(doc, &["content", "text", "description"]).unwrap_or_default(),
        );

        let mut line = format!("- {}: {}", title, snippet);
        if let Some(source) = first_text(doc, &["source", "url", "path"]) {
            line.push_str(&format!(" (source: {})", source));
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// Trims the snippet and cuts it to [`MAX_SNIPPET_CHARS`] characters,
/// marking a cut with `…`.
pub fn truncate_snippet(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= MAX_SNIPPET_CHARS {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(MAX_SNIPPET_CHARS).collect();
    cut.push('…');
    cut
}

/// First non-empty string field among `keys`.
fn first_text<'a>(doc: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| doc.get(*key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
}

fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        SEARCH_INDEX_TOOL,
        "Look up documents in the Margie's Travel knowledge base by keyword.",
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Keywords to search for."
                }
            },
            "required": ["query"]
        }),
    )
}

// ----- Azure AI Search API Types -----

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    search: &'a str,
    top: u32,
    #[serde(rename = "queryType")]
    query_type: &'static str,
    select: &'static str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    value: Vec<Map<String, Value>>,
}
