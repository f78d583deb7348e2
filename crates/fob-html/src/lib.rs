#![cfg_attr(docsrs, feature(doc_cfg))]
//! # fob-html
//!
//! Injects emitted chunk assets (scripts and stylesheets) into an HTML
//! template at the end of every build pass, and skips the work entirely when
//! nothing that affects the output has changed.
//!
//! ## Quick Start
//!
//! ```no_run
//! use fob_html::{Chunk, Compilation, HtmlPlugin, HtmlPluginOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = HtmlPluginOptions::new("src/index.html", ["vendor", "app"]).with_hash(true);
//! let mut plugin = HtmlPlugin::new(options)?;
//!
//! // Once per build pass:
//! let mut compilation = Compilation::new(".", "dist")
//!     .with_public_path("/static/")
//!     .with_chunks([
//!         Chunk::new("1", "app", "a1b2").with_files(["app.js"]).with_parent("0"),
//!         Chunk::new("0", "vendor", "c3d4").with_files(["vendor.js", "vendor.css"]),
//!     ]);
//! plugin.emit(&mut compilation).await?;
//!
//! if let Some(asset) = compilation.assets.get("index.html") {
//!     std::fs::write("dist/index.html", &asset.source)?;
//! }
//! # Ok(()) }
//! ```
//!
//! ## Pieces
//!
//! - [`changes`]: the version ledger and rebuild decision
//! - [`order`]: dependency ordering of chunks
//! - [`assemble`]: tag generation and template splicing
//! - [`plugin`]: the pass tying them together
//! - [`runtime`] and [`minify`]: filesystem and minifier collaborators

pub mod assemble;
pub mod changes;
pub mod chunk;
pub mod compilation;
pub mod minify;
pub mod order;
pub mod plugin;
pub mod runtime;

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};

pub use assemble::{AssetKind, Tags, append_hash, build_tags, inject, normalize_public_path};
pub use changes::{ChangeDetector, ChangeReport, RebuildDecision, Timestamp, VersionLedger};
pub use chunk::{Chunk, ChunkId, ParentRef};
pub use compilation::{Asset, AssetRegistry, Compilation};
pub use minify::{HtmlMinifier, Minifier};
pub use order::{CyclicDependencyError, sort_chunks};
pub use plugin::{EmitOutcome, HtmlPlugin};
pub use runtime::{FileMetadata, MemoryRuntime, NativeRuntime, Runtime, RuntimeError};

pub use fob_html_config::{ConfigError, HtmlPluginOptions, MinifyOptions};

use std::path::PathBuf;

/// Error types for fob-html operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid plugin configuration.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The relevant chunks depend on each other in a cycle.
    #[error(transparent)]
    CyclicDependency(#[from] CyclicDependencyError),

    /// The template could not be read.
    #[error("Failed to read template '{}': {source}", .path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    /// Writing the artifact to disk failed.
    #[error("Write failure at '{}': {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    /// The minifier failed.
    #[error("Minification failed: {0}")]
    Minify(String),

    /// Any other runtime failure.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Result type alias for fob-html operations.
pub type Result<T> = std::result::Result<T, Error>;

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Config(_) => "INVALID_CONFIG",
            Error::CyclicDependency(_) => "CYCLIC_DEPENDENCY",
            Error::TemplateRead { .. } => "TEMPLATE_READ",
            Error::WriteFailure { .. } => "WRITE_FAILURE",
            Error::Minify(_) => "MINIFY_ERROR",
            Error::Runtime(_) => "RUNTIME_ERROR",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::Config(err) => err
                .hint()
                .map(|hint| Box::new(hint.to_string()) as Box<dyn std::fmt::Display>),
            Error::CyclicDependency(err) => Some(Box::new(format!(
                "Chunks {} list each other as parents. Break the cycle or drop one of them from `chunks`.",
                err.cycle
                    .iter()
                    .map(|id| format!("'{id}'"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
            Error::TemplateRead { path, .. } => Some(Box::new(format!(
                "Check that '{}' exists and is UTF-8 text. The template path is resolved against the build context.",
                path.display()
            ))),
            Error::WriteFailure { .. } => Some(Box::new(
                "Failed to write file. Check disk space and permissions.",
            )),
            Error::Minify(_) | Error::Runtime(_) => None,
        }
    }
}
