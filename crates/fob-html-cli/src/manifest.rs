//! Build manifests.
//!
//! A manifest is the serialized form of a [`Compilation`]:
//!
//! ```json
//! {
//!   "context": ".",
//!   "publicPath": "/static/",
//!   "outputPath": "dist",
//!   "chunks": [
//!     { "id": 0, "name": "vendor", "hash": "v1", "files": ["vendor.js"] },
//!     { "id": 1, "name": "app", "hash": "a1", "files": ["app.js"], "parents": [0] }
//!   ],
//!   "fileTimestamps": { "src/index.html": 1700000000000 }
//! }
//! ```

use std::path::{Path, PathBuf};

use fob_html::{Compilation, Runtime};

use crate::error::{CliError, Result};

/// Read `path` and resolve every relative path in it.
///
/// `context` resolves against `cwd`; `outputPath` and the keys of
/// `fileTimestamps` resolve against `context`.
pub async fn load_manifest(runtime: &dyn Runtime, path: &Path, cwd: &Path) -> Result<Compilation> {
    let bytes = runtime.read_file(path).await?;
    let compilation: Compilation =
        serde_json::from_slice(&bytes).map_err(|source| CliError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;

    if compilation.output_path.as_os_str().is_empty() {
        return Err(CliError::MissingOutputPath(path.to_path_buf()));
    }

    Ok(resolve_paths(compilation, cwd))
}

fn resolve_paths(mut compilation: Compilation, cwd: &Path) -> Compilation {
    let context = resolve(cwd, std::mem::take(&mut compilation.context));
    compilation.output_path = resolve(&context, std::mem::take(&mut compilation.output_path));
    for (path, timestamp) in std::mem::take(&mut compilation.file_timestamps) {
        compilation.set_file_timestamp(resolve(&context, path), timestamp);
    }
    compilation.context = context;
    compilation
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else if path.as_os_str().is_empty() {
        base.to_path_buf()
    } else {
        base.join(path)
    }
}
