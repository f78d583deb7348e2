//! Plugin options.
//!
//! Field names serialize in camelCase (`alwaysWriteToDisk`, `outputPath`) so
//! that configs shared with JavaScript tooling load unchanged.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::minify::MinifyOptions;

fn default_filename() -> String {
    "index.html".to_string()
}

/// Options for the HTML injection plugin.
///
/// `template` and `chunks` are required; everything else has a default.
/// Use [`validate_schema`](crate::validate_schema) (or construct the plugin,
/// which does it for you) to reject incomplete configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlPluginOptions {
    /// Path to the HTML template, relative to the build context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,

    /// Names of the chunks whose files are referenced from the template.
    #[serde(default)]
    pub chunks: Vec<String>,

    /// Output filename within the build output (default: "index.html").
    #[serde(default = "default_filename")]
    pub filename: String,

    /// Append each chunk's hash to its asset URLs as a cache-busting query.
    #[serde(default)]
    pub hash: bool,

    /// Minify the rendered HTML with these settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minify: Option<MinifyOptions>,

    /// Also write the rendered HTML straight to disk.
    #[serde(default)]
    pub always_write_to_disk: bool,

    /// Directory used by `always_write_to_disk` instead of the build's output path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
}

impl Default for HtmlPluginOptions {
    fn default() -> Self {
        Self {
            template: None,
            chunks: Vec::new(),
            filename: default_filename(),
            hash: false,
            minify: None,
            always_write_to_disk: false,
            output_path: None,
        }
    }
}

impl HtmlPluginOptions {
    /// Create options with the two required parameters.
    ///
    /// # Example
    ///
    /// ```
    /// use fob_html_config::HtmlPluginOptions;
    ///
    /// let options = HtmlPluginOptions::new("src/index.html", ["vendor", "app"])
    ///     .with_hash(true);
    /// assert_eq!(options.filename, "index.html");
    /// assert_eq!(options.chunks, vec!["vendor", "app"]);
    /// ```
    pub fn new(
        template: impl Into<PathBuf>,
        chunks: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            template: Some(template.into()),
            chunks: chunks.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_hash(mut self, hash: bool) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_minify(mut self, minify: MinifyOptions) -> Self {
        self.minify = Some(minify);
        self
    }

    pub fn with_always_write_to_disk(mut self, always: bool) -> Self {
        self.always_write_to_disk = always;
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Create from serde_json::Value (for programmatic config)
    ///
    /// The value is deserialized only; call
    /// [`validate_schema`](crate::validate_schema) to check required fields.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Whether `name` is one of the configured chunks.
    pub fn is_relevant(&self, name: &str) -> bool {
        self.chunks.iter().any(|c| c == name)
    }
}
