//! Ignore filtering for walked files.
//!
//! A file is checked against the walk's [`IgnoreRule`] right before its task
//! would run. Ignored files are still part of the resolved total, they just
//! never reach the processor.

pub mod glob_matcher;
pub mod ignore_rule;

pub use glob_matcher::GlobMatcher;
pub use ignore_rule::{IgnorePredicate, IgnoreRule};

use walkpool_core::WalkError;

/// Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while building filters.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Invalid glob pattern provided.
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// Invalid regular expression provided.
    #[error("Invalid ignore pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// The rule only exists at runtime and cannot be rebuilt from settings.
    #[error("Ignore rule cannot be restored: {0}")]
    NotRestorable(String),
}

impl From<FilterError> for WalkError {
    fn from(err: FilterError) -> Self {
        WalkError::configuration(err.to_string())
    }
}
