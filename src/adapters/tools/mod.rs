//! Retrieval tools the model may call.
//!
//! - `rag_search` - vector RAG through Azure OpenAI with an Azure AI Search data source
//! - `search_index` - keyword lookup against the same index

mod rag_search;
mod search_index;

pub use rag_search::{RagSearchTool, RagSettings, RAG_SEARCH_TOOL};
pub use search_index::{
    format_hits, truncate_snippet, SearchIndexTool, SearchSettings, MAX_SNIPPET_CHARS,
    SEARCH_INDEX_TOOL,
};
