//! The per-pass procedure.
//!
//! ```text
//! emit(compilation)
//!   -> change detection (ledger updated)  -> skip?
//!   -> relevant chunks -> sort_chunks -> build_tags
//!   -> read template -> inject -> minify?
//!   -> write to disk?  -> register asset
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fob_html_config::{ConfigError, HtmlPluginOptions, validate_schema};
use path_clean::PathClean;

use crate::assemble::{build_tags, inject, normalize_public_path};
use crate::changes::{ChangeDetector, ChangeReport, RebuildDecision, VersionLedger};
use crate::chunk::Chunk;
use crate::compilation::{Asset, Compilation};
use crate::minify::{HtmlMinifier, Minifier};
use crate::order::sort_chunks;
use crate::runtime::{NativeRuntime, Runtime, RuntimeError};
use crate::{Error, Result};

/// Result of a successful pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitOutcome {
    /// The artifact was rendered and registered.
    Emitted {
        filename: String,
        size: usize,
        /// Where the artifact was also written, with `always_write_to_disk`.
        written_to: Option<PathBuf>,
    },
    /// Nothing relevant changed; no asset was registered.
    Skipped(RebuildDecision),
}

impl EmitOutcome {
    pub fn is_emitted(&self) -> bool {
        matches!(self, EmitOutcome::Emitted { .. })
    }
}

/// Injects chunk assets into an HTML template, once per build pass.
///
/// Each instance keeps its own [`VersionLedger`], so several plugins (one per
/// output page, say) never share change history.
///
/// # Example
///
/// ```no_run
/// use fob_html::{Chunk, Compilation, HtmlPlugin, HtmlPluginOptions};
///
/// # async fn run() -> fob_html::Result<()> {
/// let mut plugin = HtmlPlugin::new(HtmlPluginOptions::new("src/index.html", ["app"]))?;
///
/// let mut compilation = Compilation::new(".", "dist")
///     .with_public_path("/static/")
///     .with_chunks([Chunk::new("0", "app", "abc123").with_files(["app.abc123.js"])]);
///
/// plugin.emit(&mut compilation).await?;
/// assert!(compilation.assets.contains("index.html"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HtmlPlugin {
    options: HtmlPluginOptions,
    template: PathBuf,
    ledger: VersionLedger,
    runtime: Arc<dyn Runtime>,
    minifier: Arc<dyn Minifier>,
}

impl HtmlPlugin {
    /// Validate `options` and create a plugin using the local filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `template` is missing or `chunks` is empty.
    pub fn new(options: HtmlPluginOptions) -> Result<Self> {
        validate_schema(&options)?;
        let template = options.template.clone().ok_or(ConfigError::MissingTemplate)?;

        Ok(Self {
            options,
            template,
            ledger: VersionLedger::new(),
            runtime: Arc::new(NativeRuntime::from_current_dir()?),
            minifier: Arc::new(HtmlMinifier),
        })
    }

    /// Replace the filesystem collaborator.
    pub fn with_runtime(mut self, runtime: Arc<dyn Runtime>) -> Self {
        self.runtime = runtime;
        self
    }

    /// Replace the minification collaborator.
    pub fn with_minifier(mut self, minifier: Arc<dyn Minifier>) -> Self {
        self.minifier = minifier;
        self
    }

    pub fn options(&self) -> &HtmlPluginOptions {
        &self.options
    }

    pub fn ledger(&self) -> &VersionLedger {
        &self.ledger
    }

    /// Run one pass against `compilation`.
    ///
    /// The ledger is updated before anything can fail, so a failed pass
    /// still counts as "seen" for the next one. On failure nothing is
    /// registered in `compilation.assets`.
    pub async fn emit(&mut self, compilation: &mut Compilation) -> Result<EmitOutcome> {
        let template_path = compilation.context.join(&self.template).clean();
        compilation.add_file_dependency(template_path.clone());

        let report = self.detect_changes(compilation, &template_path);
        if !report.should_rebuild() {
            tracing::debug!(
                filename = %self.options.filename,
                reason = %report.decision,
                "skipping html generation"
            );
            return Ok(EmitOutcome::Skipped(report.decision));
        }

        let html = self.render(compilation, &template_path).await?;

        let written_to = if self.options.always_write_to_disk {
            Some(self.write_to_disk(compilation, &html).await?)
        } else {
            None
        };

        let asset = Asset::new(html);
        let size = asset.size;
        compilation.assets.insert(self.options.filename.clone(), asset);

        tracing::info!(
            filename = %self.options.filename,
            size,
            template_changed = report.template_changed,
            changed_chunks = report.changed_chunks.len(),
            "emitted html"
        );

        Ok(EmitOutcome::Emitted {
            filename: self.options.filename.clone(),
            size,
            written_to,
        })
    }

    fn detect_changes(&mut self, compilation: &Compilation, template_path: &Path) -> ChangeReport {
        ChangeDetector::new(self.options.hash).detect(
            &mut self.ledger,
            &compilation.chunks,
            self.options.chunks.iter().map(String::as_str),
            compilation.file_timestamp(template_path),
        )
    }

    /// Produce the final HTML text for this pass.
    async fn render(&self, compilation: &Compilation, template_path: &Path) -> Result<String> {
        let relevant: Vec<Chunk> = compilation
            .chunks
            .iter()
            .filter(|chunk| self.options.is_relevant(&chunk.name))
            .cloned()
            .collect();
        let sorted = sort_chunks(&relevant)?;

        let public_path = normalize_public_path(compilation.public_path.as_deref());
        let tags = build_tags(sorted, &public_path, self.options.hash);

        let bytes = self
            .runtime
            .read_file(template_path)
            .await
            .map_err(|source| Error::TemplateRead {
                path: template_path.to_path_buf(),
                source,
            })?;
        let template = String::from_utf8(bytes).map_err(|e| Error::TemplateRead {
            path: template_path.to_path_buf(),
            source: RuntimeError::Io(e.to_string()),
        })?;

        let html = inject(&template, &tags);

        match &self.options.minify {
            Some(options) => self.minifier.minify(&html, options),
            None => Ok(html),
        }
    }

    async fn write_to_disk(&self, compilation: &Compilation, html: &str) -> Result<PathBuf> {
        let output_dir = self
            .options
            .output_path
            .as_ref()
            .map(|dir| compilation.context.join(dir))
            .unwrap_or_else(|| compilation.output_path.clone());
        let full_path = output_dir.join(&self.options.filename);

        if let Some(parent) = full_path.parent() {
            self.runtime
                .create_dir(parent, true)
                .await
                .map_err(|source| Error::WriteFailure {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        self.runtime
            .write_file(&full_path, html.as_bytes())
            .await
            .map_err(|source| Error::WriteFailure {
                path: full_path.clone(),
                source,
            })?;

        tracing::debug!(path = %full_path.display(), "wrote html to disk");
        Ok(full_path)
    }
}
