//! In-memory file store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use walkpool_core::{FileStore, Result, WalkError};

/// Keeps file contents in a map keyed by path.
///
/// Reads of unknown paths fail with `NotFound`. Paths registered with
/// [`MemoryFileStore::deny_writes`] fail on write with `PermissionDenied`.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: RwLock<HashMap<PathBuf, String>>,
    read_only: RwLock<Vec<PathBuf>>,
}

impl MemoryFileStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `files`.
    pub fn with_files<I, P, S>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<PathBuf>,
        S: Into<String>,
    {
        Self {
            files: RwLock::new(
                files
                    .into_iter()
                    .map(|(path, content)| (path.into(), content.into()))
                    .collect(),
            ),
            read_only: RwLock::default(),
        }
    }

    /// Make writes to `path` fail.
    pub async fn deny_writes<P: Into<PathBuf>>(&self, path: P) {
        self.read_only.write().await.push(path.into());
    }

    /// Remove a file, so later reads fail.
    pub async fn remove(&self, path: &Path) -> Option<String> {
        self.files.write().await.remove(path)
    }

    /// Current contents of `path`.
    pub async fn get(&self, path: &Path) -> Option<String> {
        self.files.read().await.get(path).cloned()
    }

    /// Number of stored files.
    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    /// Whether the store holds no files.
    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn read(&self, path: &Path) -> Result<String> {
        self.files
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| WalkError::file_read(path, io::Error::from(io::ErrorKind::NotFound)))
    }

    async fn write(&self, path: &Path, content: &str) -> Result<()> {
        if self.read_only.read().await.iter().any(|p| p == path) {
            return Err(WalkError::file_write(
                path,
                io::Error::from(io::ErrorKind::PermissionDenied),
            ));
        }

        self.files
            .write()
            .await
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "MemoryFileStore"
    }
}
