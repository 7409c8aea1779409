//! Azure AI Search configuration

use secrecy::SecretString;
use serde::Deserialize;

/// Azure AI Search index configuration.
///
/// Nothing here is validated at startup; the retrieval tools report
/// missing values themselves as tool output.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Search service endpoint, e.g. `https://my-search.search.windows.net`
    pub endpoint: Option<String>,

    /// Query or admin key
    pub api_key: Option<SecretString>,

    /// Index to query
    pub index_name: Option<String>,

    /// REST API version for direct document search
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Number of hits requested by keyword search
    #[serde(default = "default_top")]
    pub top: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            index_name: None,
            api_version: default_api_version(),
            top: default_top(),
        }
    }
}

fn default_api_version() -> String {
    "2023-11-01".to_string()
}

fn default_top() -> u32 {
    5
}
