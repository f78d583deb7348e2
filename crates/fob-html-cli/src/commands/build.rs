//! `fob-html build`: one plugin pass over a build manifest.

use std::path::Path;
use std::sync::Arc;

use fob_html::{Compilation, EmitOutcome, HtmlPlugin, NativeRuntime, Runtime};

use crate::cli::BuildArgs;
use crate::commands::{current_dir, load_options};
use crate::error::Result;
use crate::manifest::load_manifest;
use crate::ui;

/// Execute the build command.
///
/// 1. Load the config and the manifest
/// 2. Stamp the template with its on-disk mtime if the manifest did not
/// 3. Run the pass
/// 4. Write every registered asset under the manifest's `outputPath`,
///    unless the pass already wrote that exact file
pub async fn execute(args: BuildArgs) -> Result<()> {
    let cwd = current_dir(args.cwd.as_deref())?;
    let options = load_options(args.config.as_deref(), &cwd)?;
    let runtime = Arc::new(NativeRuntime::new(&cwd));

    let mut compilation = load_manifest(runtime.as_ref(), &args.manifest, &cwd).await?;
    if let Some(template) = &options.template {
        stamp_template(runtime.as_ref(), &mut compilation, template).await;
    }

    let mut plugin = HtmlPlugin::new(options)?.with_runtime(runtime.clone());
    match plugin.emit(&mut compilation).await? {
        EmitOutcome::Emitted { written_to, .. } => {
            write_assets(runtime.as_ref(), &compilation, written_to.as_deref()).await
        }
        EmitOutcome::Skipped(reason) => {
            ui::info(&format!("Nothing to do ({reason})"));
            Ok(())
        }
    }
}

async fn stamp_template(runtime: &dyn Runtime, compilation: &mut Compilation, template: &Path) {
    let path = compilation.context.join(template);
    if compilation.file_timestamp(&path).is_some() {
        return;
    }
    // A missing template is reported by the pass itself.
    if let Ok(Some(modified)) = runtime.metadata(&path).await.map(|meta| meta.modified) {
        compilation.set_file_timestamp(path, modified);
    }
}

async fn write_assets(
    runtime: &dyn Runtime,
    compilation: &Compilation,
    already_written: Option<&Path>,
) -> Result<()> {
    for (filename, asset) in compilation.assets.iter() {
        let path = compilation.output_path.join(filename);
        if already_written == Some(path.as_path()) {
            tracing::debug!(path = %path.display(), "already written by the pass");
        } else {
            if let Some(parent) = path.parent() {
                runtime.create_dir(parent, true).await?;
            }
            runtime.write_file(&path, asset.source.as_bytes()).await?;
        }
        ui::success(&format!(
            "Wrote {} ({})",
            path.display(),
            ui::format_size(asset.size)
        ));
    }
    Ok(())
}
