//! Pluggable config validation strategies
//!
//! Separates filesystem validation (for CLI use) from schema validation (for library use).

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::options::HtmlPluginOptions;

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, options: &HtmlPluginOptions) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use fob_html_config::{ConfigError, HtmlPluginOptions, validate_schema};
///
/// let options = HtmlPluginOptions::new("index.html", ["app"]);
/// validate_schema(&options).unwrap();
///
/// let empty = HtmlPluginOptions::new("index.html", Vec::<String>::new());
/// assert!(matches!(validate_schema(&empty), Err(ConfigError::MissingChunks)));
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, options: &HtmlPluginOptions) -> Result<()> {
        match &options.template {
            Some(template) if !template.as_os_str().is_empty() => {}
            _ => return Err(ConfigError::MissingTemplate),
        }

        if options.chunks.is_empty() {
            return Err(ConfigError::MissingChunks);
        }

        if let Some(index) = options.chunks.iter().position(|c| c.trim().is_empty()) {
            return Err(ConfigError::EmptyChunkName { index });
        }

        if options.filename.trim().is_empty() {
            return Err(ConfigError::EmptyFilename);
        }

        Ok(())
    }
}

/// Filesystem validator (for CLI use)
///
/// Runs schema validation, then checks that the template exists under `root`.
pub struct FsValidator {
    root: PathBuf,
}

impl FsValidator {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, options: &HtmlPluginOptions) -> Result<()> {
        SchemaValidator.validate(options)?;

        if let Some(template) = &options.template {
            let path = self.root.join(template);
            if !path.is_file() {
                return Err(ConfigError::FileNotFound(path));
            }
        }

        Ok(())
    }
}

/// Convenience function for schema-only validation
pub fn validate_schema(options: &HtmlPluginOptions) -> Result<()> {
    SchemaValidator.validate(options)
}

/// Convenience function for filesystem validation rooted at `root`
pub fn validate_fs(options: &HtmlPluginOptions, root: impl AsRef<Path>) -> Result<()> {
    FsValidator::new(root).validate(options)
}
