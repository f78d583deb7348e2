//! `fob-html check`: validate configuration without building.

use fob_html_config::validate_fs;

use crate::cli::CheckArgs;
use crate::commands::{current_dir, load_options};
use crate::error::Result;
use crate::ui;

/// Load the config (file plus environment) and check that the template exists.
pub async fn execute(args: CheckArgs) -> Result<()> {
    ui::info("Checking configuration...");

    let cwd = current_dir(None)?;
    let options = load_options(args.config.as_deref(), &cwd)?;
    validate_fs(&options, &cwd)?;

    if let Some(template) = &options.template {
        ui::success(&format!("  template {} exists", template.display()));
    }
    ui::info(&format!("  chunks: {}", options.chunks.join(", ")));
    ui::info(&format!("  filename: {}", options.filename));
    if options.hash {
        ui::info("  hash: enabled");
    }
    if options.minify.is_some() {
        ui::info("  minify: enabled");
    }
    if options.always_write_to_disk {
        let target = options
            .output_path
            .as_ref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| "build output".to_string());
        ui::info(&format!("  always writes to disk ({target})"));
    }
    if options.chunks.iter().any(|name| name.trim() != name) {
        ui::warning("chunk names are matched exactly; surrounding whitespace is significant");
    }

    ui::success("Configuration is valid!");
    Ok(())
}
