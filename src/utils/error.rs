use std::path::PathBuf;
use thiserror::Error;

use crate::logs::Format;

#[derive(Error, Debug)]
pub enum LogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid {field} value '{value}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Log file already exists: {}", path.display())]
    FileExists { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Logging already initialized with {active} output")]
    AlreadyInitialized { active: Format },

    #[error("Failed to install global logger: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),

    #[error("Failed to update log level: {0}")]
    Reload(#[from] tracing_subscriber::reload::Error),
}

impl LogError {
    pub(crate) fn invalid_value(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        LogError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LogError>;
