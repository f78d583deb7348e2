//! Platform runtime abstraction
//!
//! The plugin never touches the filesystem directly. Reading the template and
//! the optional write to disk go through [`Runtime`], so embedders can serve
//! templates from memory and tests can run without a real filesystem.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use path_clean::PathClean;
use rustc_hash::FxHashMap;

use crate::changes::Timestamp;

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during runtime operations
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Runtime error: {0}")]
    Other(String),
}

/// File metadata
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Last modification time, if the filesystem reports a usable one.
    pub modified: Option<Timestamp>,
}

/// Filesystem operations used by the plugin.
#[async_trait]
pub trait Runtime: Send + Sync + std::fmt::Debug {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>>;

    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()>;

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata>;

    async fn create_dir(&self, path: &Path, recursive: bool) -> RuntimeResult<()>;
}

/// Runtime backed by the local filesystem.
///
/// Relative paths resolve against `cwd`. Blocking calls run on tokio's
/// blocking pool.
#[derive(Debug, Clone)]
pub struct NativeRuntime {
    cwd: PathBuf,
}

impl NativeRuntime {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    /// Runtime rooted at the process working directory.
    pub fn from_current_dir() -> RuntimeResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| RuntimeError::Io(format!("Failed to get current directory: {}", e)))?;
        Ok(Self::new(cwd))
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

async fn blocking<T, F>(f: F) -> RuntimeResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> RuntimeResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| RuntimeError::Other(format!("Task join error: {}", e)))?
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> RuntimeError {
    if e.kind() == std::io::ErrorKind::NotFound {
        RuntimeError::FileNotFound(path.to_path_buf())
    } else {
        RuntimeError::Io(format!("Failed to {} {}: {}", action, path.display(), e))
    }
}

#[async_trait]
impl Runtime for NativeRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        let path = self.resolve_path(path);
        blocking(move || std::fs::read(&path).map_err(|e| io_error("read", &path, e))).await
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()> {
        let path = self.resolve_path(path);
        let content = content.to_vec();
        blocking(move || {
            std::fs::write(&path, content).map_err(|e| {
                RuntimeError::Io(format!("Failed to write {}: {}", path.display(), e))
            })
        })
        .await
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let path = self.resolve_path(path);
        blocking(move || {
            let metadata =
                std::fs::metadata(&path).map_err(|e| io_error("get metadata for", &path, e))?;
            Ok(FileMetadata {
                modified: metadata.modified().ok().and_then(Timestamp::from_system_time),
            })
        })
        .await
    }

    async fn create_dir(&self, path: &Path, recursive: bool) -> RuntimeResult<()> {
        let path = self.resolve_path(path);
        blocking(move || {
            let result = if recursive {
                std::fs::create_dir_all(&path)
            } else {
                std::fs::create_dir(&path)
            };
            result.map_err(|e| {
                RuntimeError::Io(format!(
                    "Failed to create directory {}: {}",
                    path.display(),
                    e
                ))
            })
        })
        .await
    }
}

#[derive(Debug, Clone)]
struct MemoryFile {
    content: Vec<u8>,
    modified: Option<Timestamp>,
}

/// In-memory runtime.
///
/// Paths are normalized against a virtual cwd. Directories are implicit:
/// `create_dir` always succeeds.
#[derive(Debug, Clone)]
pub struct MemoryRuntime {
    files: Arc<RwLock<FxHashMap<PathBuf, MemoryFile>>>,
    cwd: PathBuf,
}

impl MemoryRuntime {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            files: Arc::new(RwLock::new(FxHashMap::default())),
            cwd: cwd.into(),
        }
    }

    fn normalize(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf().clean()
        } else {
            self.cwd.join(path).clean()
        }
    }

    /// Add or replace a file, without a modification time.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.insert(path.as_ref(), content.into(), None);
    }

    /// Add or replace a file with a modification time.
    pub fn add_file_with_mtime(
        &self,
        path: impl AsRef<Path>,
        content: impl Into<Vec<u8>>,
        modified: Timestamp,
    ) {
        self.insert(path.as_ref(), content.into(), Some(modified));
    }

    fn insert(&self, path: &Path, content: Vec<u8>, modified: Option<Timestamp>) {
        let path = self.normalize(path);
        self.files
            .write()
            .insert(path, MemoryFile { content, modified });
    }

    /// Content of a file as UTF-8, if present.
    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Option<String> {
        let path = self.normalize(path.as_ref());
        self.files
            .read()
            .get(&path)
            .map(|file| String::from_utf8_lossy(&file.content).into_owned())
    }
}

#[async_trait]
impl Runtime for MemoryRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        let normalized = self.normalize(path);
        self.files
            .read()
            .get(&normalized)
            .map(|file| file.content.clone())
            .ok_or(RuntimeError::FileNotFound(normalized))
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()> {
        self.insert(path, content.to_vec(), None);
        Ok(())
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let normalized = self.normalize(path);
        self.files
            .read()
            .get(&normalized)
            .map(|file| FileMetadata {
                modified: file.modified,
            })
            .ok_or(RuntimeError::FileNotFound(normalized))
    }

    async fn create_dir(&self, _path: &Path, _recursive: bool) -> RuntimeResult<()> {
        Ok(())
    }
}
