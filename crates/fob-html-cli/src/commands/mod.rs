//! Command implementations. Each exposes an `execute` function taking its
//! parsed arguments.

pub mod build;
pub mod check;

pub use build::execute as build_execute;
pub use check::execute as check_execute;

use std::path::{Path, PathBuf};

use fob_html_config::{ConfigDiscovery, ConfigError, HtmlPluginOptions};

use crate::error::Result;

/// Load options from `--config`, or discover them in `root`.
pub(crate) fn load_options(config: Option<&Path>, root: &Path) -> Result<HtmlPluginOptions> {
    let path = match config {
        Some(path) => root.join(path),
        None => ConfigDiscovery::new(root).find().ok_or(ConfigError::NotFound)?,
    };
    tracing::debug!(path = %path.display(), "loading config");
    Ok(fob_html_config::load(Some(&path))?)
}

pub(crate) fn current_dir(cwd: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir()?;
    Ok(match cwd {
        Some(dir) => current.join(dir),
        None => current,
    })
}
