use serde::{Deserialize, Serialize};

/// User-editable settings, persisted as JSON. Missing fields take defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AssistantSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub base_url: String,

    // Relative paths resolve against the working directory
    pub output_dir: String,

    pub request_timeout_secs: u64,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            temperature: 0.2,
            max_tokens: 3000,
            base_url: "https://api.openai.com/v1".into(),
            output_dir: "support_responses".into(),
            request_timeout_secs: 120,
        }
    }
}
