//! HTML minification.
//!
//! Minification is a collaborator behind the [`Minifier`] trait; the default
//! [`HtmlMinifier`] uses the `minify-html` crate.

use fob_html_config::MinifyOptions;

use crate::{Error, Result};

/// Minifies rendered HTML.
pub trait Minifier: Send + Sync + std::fmt::Debug {
    fn minify(&self, html: &str, options: &MinifyOptions) -> Result<String>;
}

/// [`Minifier`] backed by `minify-html`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlMinifier;

impl HtmlMinifier {
    fn cfg(options: &MinifyOptions) -> minify_html::Cfg {
        let mut cfg = minify_html::Cfg::new();
        cfg.keep_comments = options.keep_comments;
        cfg.minify_css = options.minify_css;
        cfg.minify_js = options.minify_js;
        cfg.keep_closing_tags = options.keep_closing_tags;
        cfg.keep_html_and_head_opening_tags = options.keep_html_and_head_opening_tags;
        cfg.remove_bangs = options.remove_bangs;
        cfg.remove_processing_instructions = options.remove_processing_instructions;
        cfg
    }
}

impl Minifier for HtmlMinifier {
    fn minify(&self, html: &str, options: &MinifyOptions) -> Result<String> {
        let minified = minify_html::minify(html.as_bytes(), &Self::cfg(options));
        String::from_utf8(minified).map_err(|e| Error::Minify(e.to_string()))
    }
}
