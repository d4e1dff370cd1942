//! Prelude module for convenient imports.
//!
//! ```rust
//! use walkpool_core::prelude::*;
//!
//! let progress = WalkProgress::default();
//! assert_eq!(progress.processed(), 0);
//! ```

// Re-export core error types
pub use crate::error::{Result, WalkError};

// Re-export data types
pub use crate::types::{FileFailure, ProgressSnapshot, WalkProgress, WalkReport};

// Re-export settings
pub use crate::config::{IgnoreSettings, WalkSettings};

// Re-export collaborator traits
pub use crate::traits::{FileResolver, FileStore};
