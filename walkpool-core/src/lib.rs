//! # walkpool core
//!
//! Core traits, types, and errors for the walkpool file walker.
//!
//! - **Errors**: [`WalkError`], split into run-level and per-file failures
//! - **Collaborator traits**: [`FileResolver`] for file discovery and
//!   [`FileStore`] for text I/O
//! - **Progress types**: [`WalkProgress`], [`ProgressSnapshot`], [`WalkReport`]
//! - **Settings**: serializable [`WalkSettings`](config::WalkSettings)

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export commonly used types and traits
pub mod prelude;

// Core modules
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key types at crate root for convenience
pub use config::{IgnoreSettings, WalkSettings};
pub use error::{Result, WalkError};
pub use types::{FileFailure, ProgressSnapshot, WalkProgress, WalkReport};

// Re-export traits for convenience
pub use traits::*;

/// Version information for the walkpool core library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
