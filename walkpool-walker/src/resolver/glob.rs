//! Directory-traversing glob resolver.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info, warn};

use walkpool_core::{FileResolver, Result, WalkError};

use crate::filter::GlobMatcher;

/// Resolves files by walking the directory tree below the root and matching
/// each file's root-relative path against a glob.
///
/// Hidden files and directories are included. Only regular files are
/// returned, as absolute paths sorted lexicographically.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use walkpool_core::FileResolver;
/// use walkpool_walker::resolver::GlobResolver;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let files = GlobResolver::new()
///         .resolve(Path::new("./docs"), "**/*.md")
///         .await?;
///     println!("Found {} markdown files", files.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct GlobResolver {
    /// Whether to follow symbolic links.
    follow_symlinks: bool,
    /// Whether pattern matching is case sensitive.
    case_sensitive: bool,
    /// Maximum traversal depth (unlimited if not set).
    max_depth: Option<usize>,
    /// Whether unreadable subdirectories are skipped instead of failing.
    continue_on_error: bool,
}

impl Default for GlobResolver {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            case_sensitive: true,
            max_depth: None,
            continue_on_error: false,
        }
    }
}

impl GlobResolver {
    /// Create a resolver with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to follow symbolic links.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Set whether matching is case sensitive.
    #[must_use]
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Set the maximum directory depth to descend into.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set whether to skip subdirectories that cannot be read.
    ///
    /// The root itself must always be readable.
    #[must_use]
    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Recursively traverse `dir` and collect matching files.
    fn collect<'a>(
        &'a self,
        root: &'a Path,
        dir: PathBuf,
        depth: usize,
        matcher: &'a GlobMatcher,
        files: &'a mut Vec<PathBuf>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            match self.scan(root, &dir, depth, matcher, files).await {
                Err(e) if depth > 0 && self.continue_on_error => {
                    error!("Failed to process directory {}: {}", dir.display(), e);
                    Ok(())
                }
                result => result,
            }
        })
    }

    async fn scan(
        &self,
        root: &Path,
        dir: &Path,
        depth: usize,
        matcher: &GlobMatcher,
        files: &mut Vec<PathBuf>,
    ) -> Result<()> {
        let mut entries = fs::read_dir(dir)
            .await
            .map_err(|e| WalkError::resolution(dir, e.to_string()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| WalkError::resolution(dir, e.to_string()))?
        {
            let path = entry.path();

            let metadata = if self.follow_symlinks {
                fs::metadata(&path).await
            } else {
                fs::symlink_metadata(&path).await
            };

            let metadata = match metadata {
                Ok(metadata) => metadata,
                Err(e) => {
                    // Entries can vanish between listing and stat.
                    warn!("Failed to read metadata for {}: {}", path.display(), e);
                    continue;
                }
            };

            if metadata.is_file() {
                let relative = path.strip_prefix(root).unwrap_or(&path);
                if matcher.is_match(relative) {
                    files.push(path);
                }
            } else if metadata.is_dir() {
                if self.max_depth.is_some_and(|max| depth + 1 >= max) {
                    debug!("Reached maximum depth at {}", path.display());
                    continue;
                }
                self.collect(root, path, depth + 1, matcher, files).await?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl FileResolver for GlobResolver {
    async fn resolve(&self, root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        let matcher = GlobMatcher::new(&[pattern], self.case_sensitive)?;

        let root = fs::canonicalize(root)
            .await
            .map_err(|e| WalkError::resolution(root, e.to_string()))?;

        let metadata = fs::metadata(&root)
            .await
            .map_err(|e| WalkError::resolution(&root, e.to_string()))?;
        if !metadata.is_dir() {
            return Err(WalkError::resolution(&root, "not a directory"));
        }

        debug!("Resolving '{}' under {}", pattern, root.display());

        let mut files = Vec::new();
        self.collect(&root, root.clone(), 0, &matcher, &mut files)
            .await?;
        files.sort();

        info!(
            "Resolved {} files for '{}' under {}",
            files.len(),
            pattern,
            root.display()
        );
        Ok(files)
    }

    fn name(&self) -> &'static str {
        "GlobResolver"
    }
}
