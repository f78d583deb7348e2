//! Reference tag generation and template splicing.
//!
//! The template is treated as plain text with two anchor points, the first
//! `</head>` and the first `</body>` (ASCII case-insensitive). It is never
//! parsed as HTML.

use crate::chunk::Chunk;

/// Kind of asset a filename refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Script,
    Stylesheet,
}

impl AssetKind {
    /// Classify by extension: `.js` or `.css`, optionally followed by a query.
    ///
    /// Anything else (source maps, images, `.mjs`) is not referenced.
    pub fn classify(file: &str) -> Option<Self> {
        if has_extension(file, ".js") {
            Some(AssetKind::Script)
        } else if has_extension(file, ".css") {
            Some(AssetKind::Stylesheet)
        } else {
            None
        }
    }

    fn tag(self, url: &str) -> String {
        match self {
            AssetKind::Script => {
                format!(r#"<script type="text/javascript" src="{url}"></script>"#)
            }
            AssetKind::Stylesheet => format!(r#"<link href="{url}" rel="stylesheet" />"#),
        }
    }
}

/// `ext` occurs followed by the end of the name or a `?`.
fn has_extension(file: &str, ext: &str) -> bool {
    file.match_indices(ext)
        .any(|(at, _)| matches!(file.as_bytes().get(at + ext.len()), None | Some(b'?')))
}

/// Make a non-empty public path end with `/`.
pub fn normalize_public_path(public_path: Option<&str>) -> String {
    match public_path {
        None | Some("") => String::new(),
        Some(path) if path.ends_with('/') => path.to_string(),
        Some(path) => format!("{path}/"),
    }
}

/// Append `hash` as a query parameter, respecting an existing query string.
pub fn append_hash(file: &str, hash: &str) -> String {
    let separator = if file.contains('?') { '&' } else { '?' };
    format!("{file}{separator}{hash}")
}

/// Reference tags, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    /// Stylesheet links, inserted before `</head>`.
    pub head: Vec<String>,
    /// Script tags, inserted before `</body>`.
    pub body: Vec<String>,
}

/// Build tags for every referenced file of the already sorted `chunks`.
///
/// `public_path` must already be normalized.
pub fn build_tags<'a>(
    chunks: impl IntoIterator<Item = &'a Chunk>,
    public_path: &str,
    hash_enabled: bool,
) -> Tags {
    let mut tags = Tags::default();

    for chunk in chunks {
        for file in &chunk.files {
            let Some(kind) = AssetKind::classify(file) else {
                continue;
            };

            let url = if hash_enabled {
                format!("{public_path}{}", append_hash(file, &chunk.hash))
            } else {
                format!("{public_path}{file}")
            };

            match kind {
                AssetKind::Script => tags.body.push(kind.tag(&url)),
                AssetKind::Stylesheet => tags.head.push(kind.tag(&url)),
            }
        }
    }

    tags
}

/// Byte offset of the first ASCII case-insensitive occurrence of `needle`.
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

fn insert_before(html: &mut String, anchor: &str, tags: &[String]) {
    if tags.is_empty() {
        return;
    }
    if let Some(at) = find_ignore_ascii_case(html, anchor) {
        html.insert_str(at, &tags.concat());
    }
}

/// Splice `tags` into `template`.
///
/// A missing `</head>` or `</body>` skips that group of tags.
pub fn inject(template: &str, tags: &Tags) -> String {
    let mut html = template.to_string();
    insert_before(&mut html, "</head>", &tags.head);
    insert_before(&mut html, "</body>", &tags.body);
    html
}
