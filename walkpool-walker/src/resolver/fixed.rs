//! A resolver over a precomputed file list.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use walkpool_core::{FileResolver, Result};

/// Returns the same list of files for every root and pattern.
///
/// Useful when the file list comes from somewhere other than a directory
/// walk, such as `git ls-files` output or a manifest. Relative entries are
/// joined onto the root.
#[derive(Debug, Clone, Default)]
pub struct FixedFileSet {
    files: Vec<PathBuf>,
}

impl FixedFileSet {
    /// Create a resolver over `files`, keeping their order.
    pub fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    /// The configured files.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

#[async_trait]
impl FileResolver for FixedFileSet {
    async fn resolve(&self, root: &Path, _pattern: &str) -> Result<Vec<PathBuf>> {
        Ok(self
            .files
            .iter()
            .map(|file| {
                if file.is_absolute() {
                    file.clone()
                } else {
                    root.join(file)
                }
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "FixedFileSet"
    }
}
