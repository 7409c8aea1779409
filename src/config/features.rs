//! Feature flags configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Tool names the registry knows how to build
pub const KNOWN_TOOLS: &[&str] = &["rag_search", "search_index"];

/// Feature flags selecting between bot variants
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    /// Drop delivery/read status callbacks before message extraction
    #[serde(default = "default_true")]
    pub enable_status_filtering: bool,

    /// Comma-separated tool names to register
    #[serde(default = "default_enabled_tools")]
    pub enabled_tools: String,

    /// Keep per-sender conversation history between webhook deliveries
    #[serde(default)]
    pub retain_history: bool,

    /// Idle time after which retained history is discarded
    #[serde(default = "default_history_ttl")]
    pub history_ttl_secs: u64,
}

impl FeatureFlags {
    /// Enabled tool names in declaration order, blanks removed
    pub fn enabled_tools_list(&self) -> Vec<String> {
        self.enabled_tools
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn history_ttl(&self) -> Duration {
        Duration::from_secs(self.history_ttl_secs)
    }

    /// Validate feature flags
    pub fn validate(&self) -> Result<(), ValidationError> {
        for name in self.enabled_tools_list() {
            if !KNOWN_TOOLS.contains(&name.as_str()) {
                return Err(ValidationError::UnknownTool(name));
            }
        }
        Ok(())
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_status_filtering: true,
            enabled_tools: default_enabled_tools(),
            retain_history: false,
            history_ttl_secs: default_history_ttl(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_enabled_tools() -> String {
    "rag_search".to_string()
}

fn default_history_ttl() -> u64 {
    1800
}
