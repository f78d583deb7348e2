//! The bundling host's view of one build pass.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use path_clean::PathClean;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::changes::Timestamp;
use crate::chunk::Chunk;

/// An output file registered with the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub source: String,
    /// Size of `source` in bytes.
    pub size: usize,
}

impl Asset {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let size = source.len();
        Self { source, size }
    }
}

/// Output assets keyed by filename, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRegistry {
    assets: IndexMap<String, Asset>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `asset` under `filename`, replacing any previous entry.
    pub fn insert(&mut self, filename: impl Into<String>, asset: Asset) -> Option<Asset> {
        self.assets.insert(filename.into(), asset)
    }

    pub fn get(&self, filename: &str) -> Option<&Asset> {
        self.assets.get(filename)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.assets.contains_key(filename)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Asset)> {
        self.assets.iter().map(|(name, asset)| (name.as_str(), asset))
    }
}

/// Everything the host supplies for one pass, plus the asset registry the
/// plugin writes into.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compilation {
    /// Project root; the template path is resolved against it.
    #[serde(default)]
    pub context: PathBuf,

    #[serde(default)]
    pub chunks: Vec<Chunk>,

    /// Last-modified times of watched files.
    #[serde(default)]
    pub file_timestamps: FxHashMap<PathBuf, Timestamp>,

    /// URL prefix for emitted assets.
    #[serde(default)]
    pub public_path: Option<String>,

    /// The host's output directory.
    #[serde(default)]
    pub output_path: PathBuf,

    #[serde(default)]
    pub assets: AssetRegistry,

    /// Files the host should watch for this pass.
    #[serde(default)]
    pub file_dependencies: Vec<PathBuf>,
}

impl Compilation {
    pub fn new(context: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            context: context.into(),
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    pub fn with_chunks(mut self, chunks: impl IntoIterator<Item = Chunk>) -> Self {
        self.chunks = chunks.into_iter().collect();
        self
    }

    pub fn with_public_path(mut self, public_path: impl Into<String>) -> Self {
        self.public_path = Some(public_path.into());
        self
    }

    pub fn with_file_timestamp(mut self, path: impl Into<PathBuf>, timestamp: Timestamp) -> Self {
        self.set_file_timestamp(path, timestamp);
        self
    }

    /// Record the modification time of `path`. Keys are stored cleaned.
    pub fn set_file_timestamp(&mut self, path: impl Into<PathBuf>, timestamp: Timestamp) {
        self.file_timestamps.insert(path.into().clean(), timestamp);
    }

    /// Modification time of `path`, ignoring `.` and `..` spelling differences.
    ///
    /// Keys deserialized from a host manifest are not cleaned, so a miss on
    /// the cleaned path falls back to comparing every cleaned key.
    pub fn file_timestamp(&self, path: &Path) -> Option<Timestamp> {
        let wanted = path.clean();
        self.file_timestamps.get(&wanted).copied().or_else(|| {
            self.file_timestamps
                .iter()
                .find(|(key, _)| key.clean() == wanted)
                .map(|(_, timestamp)| *timestamp)
        })
    }

    /// Record `path` as a file dependency, once.
    pub fn add_file_dependency(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.file_dependencies.contains(&path) {
            self.file_dependencies.push(path);
        }
    }
}
