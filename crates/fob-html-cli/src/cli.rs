//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// fob-html - inject chunk assets into an HTML template
#[derive(Parser, Debug)]
#[command(
    name = "fob-html",
    version,
    about = "Inject a build's chunk assets into an HTML template",
    long_about = "fob-html reads a build manifest (chunks, public path, output path),\n\
                  orders the configured chunks by their dependencies and writes an HTML\n\
                  page referencing their scripts and stylesheets."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one pass over a build manifest and write the HTML page
    ///
    /// The manifest is JSON: `{ context?, publicPath?, outputPath, chunks,
    /// fileTimestamps? }`. Relative paths resolve against `context`, which
    /// itself resolves against `--cwd`.
    Build(BuildArgs),

    /// Validate the plugin configuration
    ///
    /// Loads fob-html.toml / fob-html.json (or `--config`), applies
    /// FOB_HTML_* environment overrides and checks that the template exists.
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Path to the build manifest (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub manifest: PathBuf,

    /// Config file (defaults to fob-html.toml or fob-html.json in the working directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Working directory
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Config file (defaults to fob-html.toml or fob-html.json in the working directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
