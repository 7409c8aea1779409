//! Assistant persona configuration
//!
//! The persona can be set directly through environment variables or loaded
//! from a YAML instructions file of the form:
//!
//! ```yaml
//! name: travel-agent
//! messages:
//!   system: You are a helpful travel assistant.
//! ```

use serde::Deserialize;
use std::path::Path;

use super::error::ValidationError;

/// Assistant persona and reply configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// Display name of the assistant
    #[serde(default = "default_name")]
    pub name: String,

    /// System instruction placed at the start of every conversation
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Optional YAML file overriding `name` and `system_prompt`
    pub instructions_path: Option<String>,

    /// Sampling temperature for completions
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Reply sent when the orchestrator fails
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,
}

/// On-disk instructions document
#[derive(Debug, Clone, Deserialize, Default)]
pub struct InstructionsFile {
    pub name: Option<String>,
    #[serde(default)]
    pub messages: InstructionMessages,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct InstructionMessages {
    pub system: Option<String>,
}

impl AssistantConfig {
    /// Resolve the persona, applying the instructions file when configured.
    ///
    /// Fields absent from the file keep their configured values.
    pub fn resolved(&self) -> Result<Self, ValidationError> {
        let Some(path) = self.instructions_path.as_deref() else {
            return Ok(self.clone());
        };

        let file = load_instructions(Path::new(path))?;
        let mut resolved = self.clone();
        if let Some(name) = file.name.filter(|n| !n.trim().is_empty()) {
            resolved.name = name;
        }
        if let Some(system) = file.messages.system.filter(|s| !s.trim().is_empty()) {
            resolved.system_prompt = system.trim().to_string();
        }
        Ok(resolved)
    }

    /// Validate assistant configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if let Some(path) = self.instructions_path.as_deref() {
            load_instructions(Path::new(path))?;
        }
        Ok(())
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            system_prompt: default_system_prompt(),
            instructions_path: None,
            temperature: default_temperature(),
            fallback_reply: default_fallback_reply(),
        }
    }
}

fn load_instructions(path: &Path) -> Result<InstructionsFile, ValidationError> {
    let unreadable = |reason: String| ValidationError::InstructionsUnreadable {
        path: path.display().to_string(),
        reason,
    };
    let raw = std::fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
    serde_yaml::from_str(&raw).map_err(|e| unreadable(e.to_string()))
}

fn default_name() -> String {
    "travel-agent".to_string()
}

/// Instruction used when neither configuration nor history supplies one.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a travel assistant that provides information on travel services available from Margie's Travel.";

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_fallback_reply() -> String {
    "Sorry, something went wrong.".to_string()
}
