//! File and environment based config loading.
//!
//! Sources are layered with figment, later sources winning:
//! serde defaults, then the config file, then `FOB_HTML_*` environment variables.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Toml},
};

use crate::error::{ConfigError, Result};
use crate::options::HtmlPluginOptions;
use crate::validation::validate_schema;

/// Config file names searched by [`ConfigDiscovery::find`], in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["fob-html.toml", "fob-html.json"];

/// Environment variable prefix, e.g. `FOB_HTML_HASH=true`.
pub const ENV_PREFIX: &str = "FOB_HTML_";

/// File-based configuration discovery
///
/// # Example
///
/// ```no_run
/// use fob_html_config::ConfigDiscovery;
///
/// let options = ConfigDiscovery::new(".").load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory.
    pub fn find(&self) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| self.root.join(name))
            .find(|path| path.is_file())
    }

    /// Load and validate config from the discovered file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<HtmlPluginOptions> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        load(Some(&path))
    }
}

/// Load options from `path` (or nothing) layered with the environment, then validate.
///
/// Without a path only serde defaults and environment variables contribute,
/// which is enough when `FOB_HTML_TEMPLATE` and `FOB_HTML_CHUNKS` are set.
pub fn load(path: Option<&Path>) -> Result<HtmlPluginOptions> {
    let options = figment(path)?
        .extract::<HtmlPluginOptions>()
        .map_err(|e| ConfigError::InvalidValue {
            field: e.path.join("."),
            hint: Some(e.kind.to_string()),
        })?;

    validate_schema(&options)?;
    tracing::debug!(
        template = ?options.template,
        chunks = ?options.chunks,
        filename = %options.filename,
        "loaded html plugin config"
    );
    Ok(options)
}

fn figment(path: Option<&Path>) -> Result<Figment> {
    let mut figment = Figment::new();

    if let Some(path) = path {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => figment.merge(Toml::file(path)),
            Some("json") => figment.merge(Json::file(path)),
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ));
            }
        };
    }

    let env = Env::prefixed(ENV_PREFIX)
        .lowercase(false)
        .map(|key| snake_to_camel(key.as_str()).into());

    Ok(figment.merge(env))
}

/// `ALWAYS_WRITE_TO_DISK` -> `alwaysWriteToDisk`
fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}
