//! # walkpool
//!
//! Walk a file tree and run an async processor over every matching file,
//! with a fixed ceiling on how many files are processed at once.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use walkpool::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = WalkConfig::new().with_pattern("**/*.md").with_concurrency(4);
//!     let lines = walk(WalkOptions::new(config), |ctx| async move {
//!         Ok(ctx.read().await?.lines().count())
//!     })
//!     .await?;
//!
//!     println!("{} lines", lines.iter().sum::<usize>());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **walkpool-core**: errors, collaborator traits, progress types and settings
//! - **walkpool-walker**: resolvers, ignore filters, stores, executor and the walk engine

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export all public APIs from sub-crates
pub use walkpool_core as core;
pub use walkpool_walker as walker;

/// Prelude module for convenient imports.
///
/// Re-exports the most commonly used types and traits from both crates.
pub mod prelude {
    pub use walkpool_walker::prelude::*;
}

/// Version information for the walkpool framework.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
