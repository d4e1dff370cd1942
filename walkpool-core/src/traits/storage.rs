//! Text file storage traits.

use async_trait::async_trait;
use std::path::Path;

use crate::Result;

/// Reads and writes whole text files.
///
/// Each call goes to the backing store; implementations must not cache file
/// contents between calls.
#[async_trait]
pub trait FileStore: Send + Sync + std::fmt::Debug {
    /// Read the file at `path` as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WalkError::FileRead`] if the file is missing,
    /// unreadable, or not valid UTF-8.
    async fn read(&self, path: &Path) -> Result<String>;

    /// Replace the contents of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WalkError::FileWrite`] if the file cannot be written.
    async fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Get a human-readable name for this store.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
