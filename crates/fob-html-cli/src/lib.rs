//! Command-line interface for the fob HTML plugin.
//!
//! Runs a single plugin pass over a build manifest produced by some other
//! tool, so the plugin can be used outside of a bundler host.
//!
//! - [`cli`] - argument definitions
//! - [`commands`] - `build` and `check`
//! - [`error`] - CLI error type and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`manifest`] - build manifest loading
//! - [`ui`] - status messages

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod manifest;
pub mod ui;

pub use error::{CliError, Result};
