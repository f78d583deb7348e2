//! Error types for configuration validation and loading.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Schema validation errors (no filesystem checks)
    #[error("missing required parameter: template (string)")]
    MissingTemplate,

    #[error("missing required non-empty parameter: chunks (string[])")]
    MissingChunks,

    #[error("chunk name at index {index} is empty")]
    EmptyChunkName { index: usize },

    #[error("output filename cannot be empty")]
    EmptyFilename,

    // Config parsing/loading errors
    #[error("config not found")]
    NotFound,

    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid config value for '{field}'{}", .hint.as_ref().map(|h| format!(": {h}")).unwrap_or_default())]
    InvalidValue { field: String, hint: Option<String> },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Suggested fix, if the error has an obvious one.
    pub fn hint(&self) -> Option<&str> {
        match self {
            ConfigError::MissingTemplate => {
                Some("Set `template` to the path of your HTML template")
            }
            ConfigError::MissingChunks => {
                Some("List at least one chunk name in `chunks`, e.g. [\"app\"]")
            }
            ConfigError::EmptyChunkName { .. } => Some("Remove empty strings from `chunks`"),
            ConfigError::EmptyFilename => Some("Omit `filename` to use the default index.html"),
            ConfigError::NotFound => {
                Some("Create fob-html.toml or fob-html.json, or pass --config")
            }
            ConfigError::InvalidValue { hint, .. } => hint.as_deref(),
            ConfigError::UnsupportedFormat(_) => Some("Use a .toml or .json config file"),
            ConfigError::FileNotFound(_) | ConfigError::Io(_) => None,
        }
    }
}
