use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::settings::AssistantSettings;
use crate::model::error::ConfigError;

pub fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("agent_support_gws");
    path.push("settings.json");
    path
}

/// Reads settings from `path`. A missing file is seeded with the defaults.
pub fn load_settings(path: &Path) -> Result<AssistantSettings, ConfigError> {
    match fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw).map_err(|source| ConfigError::SettingsFormat {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let settings = AssistantSettings::default();
            if let Err(e) = save_settings(path, &settings) {
                log::warn!("Could not write default settings to {}: {}", path.display(), e);
            }
            Ok(settings)
        }
        Err(source) => Err(ConfigError::Settings {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn save_settings(path: &Path, settings: &AssistantSettings) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)
}
