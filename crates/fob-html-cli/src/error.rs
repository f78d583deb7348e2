//! CLI error type.
//!
//! Library errors are wrapped as-is so their diagnostic codes and help text
//! survive into the miette report.

use std::path::PathBuf;

use fob_html::RuntimeError;
use fob_html_config::ConfigError;
use miette::Report;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Plugin(#[from] fob_html::Error),

    #[error("Invalid manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Manifest {} has no outputPath\n\nHint: Add \"outputPath\": \"dist\" to the manifest", .0.display())]
    MissingOutputPath(PathBuf),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error(transparent)]
    Runtime(RuntimeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RuntimeError> for CliError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::FileNotFound(path) => CliError::FileNotFound(path),
            other => CliError::Runtime(other),
        }
    }
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert a CLI error into a miette report.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        // Route through the library error to pick up its code and help.
        CliError::Config(e) => Report::new(fob_html::Error::Config(e)),
        CliError::Plugin(e) => Report::new(e),
        other => miette::miette!("{}", other),
    }
}
