//! Configuration for the fob HTML injection plugin.
//!
//! The plugin is configured once, at construction time. Options can be built
//! in code, deserialized from a `serde_json::Value`, or layered from a config
//! file and `FOB_HTML_*` environment variables with [`load`].

pub mod error;
pub mod loading;
pub mod minify;
pub mod options;
pub mod validation;

pub use error::*;
pub use loading::{ConfigDiscovery, load};
pub use minify::MinifyOptions;
pub use options::HtmlPluginOptions;
pub use validation::{ConfigValidator, FsValidator, SchemaValidator, validate_fs, validate_schema};
