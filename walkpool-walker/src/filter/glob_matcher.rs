//! Glob pattern matching backed by `globset`.

use super::{FilterError, FilterResult};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;
use tracing::debug;

/// A compiled set of glob patterns.
///
/// `*` and `?` never cross a path separator, so `*.txt` only matches files
/// directly below the root while `**/*.txt` matches at any depth.
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    /// Compiled patterns.
    set: GlobSet,

    /// Pattern sources, kept for diagnostics.
    patterns: Vec<String>,

    /// Whether pattern matching is case sensitive.
    case_sensitive: bool,
}

impl GlobMatcher {
    /// Compile `patterns` into a matcher.
    pub fn new<S: AsRef<str>>(patterns: &[S], case_sensitive: bool) -> FilterResult<Self> {
        debug!("Creating GlobMatcher with {} patterns", patterns.len());

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .case_insensitive(!case_sensitive)
                .build()
                .map_err(|e| FilterError::InvalidGlob(format!("Pattern '{pattern}': {e}")))?;
            builder.add(glob);
        }

        let set = builder
            .build()
            .map_err(|e| FilterError::InvalidGlob(format!("Failed to build glob set: {e}")))?;

        Ok(Self {
            set,
            patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
            case_sensitive,
        })
    }

    /// Compile a single case-sensitive pattern.
    pub fn single(pattern: &str) -> FilterResult<Self> {
        Self::new(&[pattern], true)
    }

    /// Check if a path matches any pattern.
    #[must_use]
    pub fn is_match(&self, path: &Path) -> bool {
        self.set.is_match(path)
    }

    /// The pattern sources this matcher was built from.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Get whether the matcher is case sensitive.
    #[must_use]
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}
