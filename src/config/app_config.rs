use std::path::PathBuf;

use crate::config::settings::AssistantSettings;
use crate::model::error::ConfigError;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Everything the assistant needs, validated once before the menu starts.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub settings: AssistantSettings,
}

impl AppConfig {
    pub fn from_env(settings: AssistantSettings) -> Result<Self, ConfigError> {
        Self::from_lookup(settings, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(settings: AssistantSettings, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let config = Self { api_key, settings };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.settings;
        if s.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".into()));
        }
        if s.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&s.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature must be between 0 and 2, got {}",
                s.temperature
            )));
        }
        if s.max_tokens == 0 {
            return Err(ConfigError::Invalid("max_tokens must be positive".into()));
        }
        if s.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be positive".into(),
            ));
        }
        if s.output_dir.trim().is_empty() {
            return Err(ConfigError::Invalid("output_dir must not be empty".into()));
        }
        Ok(())
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.settings.output_dir)
    }
}
