use serde::{Deserialize, Serialize};

/// Switches forwarded to the HTML minifier.
///
/// Only consulted when `minify` is present in [`HtmlPluginOptions`](crate::HtmlPluginOptions);
/// an absent `minify` section leaves the rendered HTML untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MinifyOptions {
    /// Keep `<!-- ... -->` comments.
    pub keep_comments: bool,

    /// Minify inline `<style>` contents.
    pub minify_css: bool,

    /// Minify inline `<script>` contents.
    pub minify_js: bool,

    /// Keep optional closing tags such as `</li>`.
    pub keep_closing_tags: bool,

    /// Keep `<html>` and `<head>` opening tags.
    pub keep_html_and_head_opening_tags: bool,

    /// Remove `<!...>` bang constructs other than the doctype.
    pub remove_bangs: bool,

    /// Remove `<?...?>` processing instructions.
    pub remove_processing_instructions: bool,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            keep_comments: false,
            minify_css: true,
            minify_js: true,
            keep_closing_tags: true,
            keep_html_and_head_opening_tags: true,
            remove_bangs: false,
            remove_processing_instructions: false,
        }
    }
}

impl MinifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }
}
