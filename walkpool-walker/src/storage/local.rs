//! Filesystem-backed file store.

use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

use walkpool_core::{FileStore, Result, WalkError};

/// Reads and writes files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStore;

impl LocalFileStore {
    /// Create a new local file store.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn read(&self, path: &Path) -> Result<String> {
        debug!("Reading text file: {}", path.display());
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| WalkError::file_read(path, e))
    }

    async fn write(&self, path: &Path, content: &str) -> Result<()> {
        debug!("Writing {} bytes to {}", content.len(), path.display());
        tokio::fs::write(path, content)
            .await
            .map_err(|e| WalkError::file_write(path, e))
    }

    fn name(&self) -> &'static str {
        "LocalFileStore"
    }
}
