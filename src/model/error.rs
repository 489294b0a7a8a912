use std::path::PathBuf;

use thiserror::Error;

use crate::model::prompt_spec::Stage;

/// Startup failures. These are the only errors allowed to stop the program.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("OpenAI API key not found. Set OPENAI_API_KEY in the environment or in a .env file")]
    MissingApiKey,

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not read settings file {}: {source}", path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings file {} is not valid JSON: {source}", path.display())]
    SettingsFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures talking to the chat-completion endpoint.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed model response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Model response contained no choices")]
    NoChoices,
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{stage} stage failed: {source}")]
    Model {
        stage: Stage,
        #[source]
        source: LlmError,
    },

    #[error("{stage} stage returned an empty response")]
    EmptyResponse { stage: Stage },
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Model { stage, .. } | PipelineError::EmptyResponse { stage } => *stage,
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Could not create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write record {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No free file name for record {stem} after {attempts} attempts")]
    TooManyCollisions { stem: String, attempts: u32 },
}
