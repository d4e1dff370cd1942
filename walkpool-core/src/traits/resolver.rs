//! File set resolution traits.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::Result;

/// Turns a root directory and a selection pattern into an ordered list of
/// absolute file paths.
///
/// The order returned here is the order results are reported in, so
/// implementations should be deterministic.
///
/// # Examples
///
/// ```rust,no_run
/// use async_trait::async_trait;
/// use std::path::{Path, PathBuf};
/// use walkpool_core::traits::FileResolver;
/// use walkpool_core::Result;
///
/// #[derive(Debug)]
/// struct SingleFile(PathBuf);
///
/// #[async_trait]
/// impl FileResolver for SingleFile {
///     async fn resolve(&self, _root: &Path, _pattern: &str) -> Result<Vec<PathBuf>> {
///         Ok(vec![self.0.clone()])
///     }
/// }
/// ```
#[async_trait]
pub trait FileResolver: Send + Sync + std::fmt::Debug {
    /// Resolve the files matching `pattern` below `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be traversed or the pattern is
    /// invalid. The walk engine treats any error here as fatal for the run.
    async fn resolve(&self, root: &Path, pattern: &str) -> Result<Vec<PathBuf>>;

    /// Get a human-readable name for this resolver.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
