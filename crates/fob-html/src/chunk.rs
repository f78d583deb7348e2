//! Chunk data model.
//!
//! Chunks arrive fresh from the bundling host on every pass. A parent entry
//! is either an identifier to resolve against the current chunk set or a
//! complete chunk supplied inline; the distinction is made once, when the
//! chunk is ingested, and carried as [`ParentRef`].

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Stable identifier of a chunk within one pass.
///
/// Hosts that number their chunks can pass integers; they are kept as their
/// decimal text so `1` and `"1"` name the same chunk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ChunkId(String);

impl ChunkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChunkId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ChunkId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for ChunkId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ChunkId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(id) => ChunkId(id),
            RawId::Number(id) => ChunkId::from(id),
        })
    }
}

/// A dependency of a chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParentRef {
    /// The parent chunk itself, supplied by the host.
    Inline(Box<Chunk>),
    /// Identifier of a parent chunk, resolved against the current pass.
    Id(ChunkId),
}

impl ParentRef {
    /// Identifier of the referenced chunk, whichever form it takes.
    pub fn id(&self) -> &ChunkId {
        match self {
            ParentRef::Inline(chunk) => &chunk.id,
            ParentRef::Id(id) => id,
        }
    }
}

/// One emitted group of build outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,

    /// Logical name matched against the configured chunk list. Not unique.
    #[serde(default)]
    pub name: String,

    /// Content fingerprint; changes whenever the chunk's output changes.
    #[serde(default)]
    pub hash: String,

    /// Output filenames in emission order.
    #[serde(default)]
    pub files: Vec<String>,

    #[serde(default)]
    pub parents: Vec<ParentRef>,
}

impl Chunk {
    pub fn new(id: impl Into<ChunkId>, name: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hash: hash.into(),
            files: Vec::new(),
            parents: Vec::new(),
        }
    }

    pub fn with_files(mut self, files: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parent(mut self, id: impl Into<ChunkId>) -> Self {
        self.parents.push(ParentRef::Id(id.into()));
        self
    }

    pub fn with_inline_parent(mut self, parent: Chunk) -> Self {
        self.parents.push(ParentRef::Inline(Box::new(parent)));
        self
    }
}
