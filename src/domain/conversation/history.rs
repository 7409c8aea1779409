//! Prior turns supplied to the retrieval tool as serialized JSON.

use serde::{Deserialize, Serialize};

use super::message::Message;

/// Relaxed `{role, content}` pair accepted from the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

impl HistoryEntry {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Converts to a chat message. Unrecognized roles become user turns.
    pub fn to_message(&self) -> Message {
        match self.role.as_str() {
            "system" => Message::system(&self.content),
            "assistant" => Message::assistant(&self.content),
            _ => Message::user(&self.content),
        }
    }
}

/// Parses serialized history, keeping only well-formed entries.
///
/// Anything that is not a JSON array yields an empty history. Inside the
/// array, entries that are not objects with string `role` and `content`
/// fields are skipped.
pub fn parse_history(json: Option<&str>) -> Vec<HistoryEntry> {
    let Some(raw) = json.filter(|s| !s.trim().is_empty()) else {
        return Vec::new();
    };

    let Ok(serde_json::Value::Array(items)) = serde_json::from_str(raw) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let object = item.as_object()?;
            let role = object.get("role")?.as_str()?;
            let content = object.get("content")?.as_str()?;
            Some(HistoryEntry::new(role, content))
        })
        .collect()
}
