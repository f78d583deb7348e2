//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use fob_html::{Chunk, Compilation, HtmlPlugin, HtmlPluginOptions, MemoryRuntime, Timestamp};

pub const CONTEXT: &str = "/project";
pub const TEMPLATE: &str = "src/index.html";
pub const TEMPLATE_PATH: &str = "/project/src/index.html";
pub const BASIC_TEMPLATE: &str = "<html><head></head><body></body></html>";

/// Memory runtime holding `template` at [`TEMPLATE_PATH`].
pub fn runtime_with_template(template: &str) -> Arc<MemoryRuntime> {
    let runtime = MemoryRuntime::new(CONTEXT);
    runtime.add_file(TEMPLATE_PATH, template);
    Arc::new(runtime)
}

pub fn plugin(options: HtmlPluginOptions, runtime: Arc<MemoryRuntime>) -> HtmlPlugin {
    HtmlPlugin::new(options).unwrap().with_runtime(runtime)
}

pub fn options(chunks: &[&str]) -> HtmlPluginOptions {
    HtmlPluginOptions::new(TEMPLATE, chunks.iter().copied())
}

/// A pass over `chunks` with the template stamped at `mtime`.
pub fn pass(chunks: Vec<Chunk>, mtime: u64) -> Compilation {
    Compilation::new(CONTEXT, "/project/dist")
        .with_public_path("/static/")
        .with_file_timestamp(TEMPLATE_PATH, Timestamp::from_millis(mtime))
        .with_chunks(chunks)
}

pub fn js_chunk(id: &str, name: &str, hash: &str) -> Chunk {
    Chunk::new(id, name, hash).with_files([format!("{name}.{hash}.js")])
}

pub fn html(compilation: &Compilation) -> &str {
    &compilation
        .assets
        .get("index.html")
        .expect("index.html registered")
        .source
}
