//! Bounded-concurrency file walking for walkpool.
//!
//! This crate resolves a set of files under a root directory and runs an
//! async processor over each of them with a fixed concurrency ceiling. It
//! includes:
//!
//! - **Resolvers**: glob-based directory resolution and fixed file lists
//! - **Filters**: regex, glob and predicate ignore rules
//! - **Stores**: local filesystem and in-memory text stores
//! - **Engine**: the [`Walk`](engine::Walk) runner, hooks and progress counters
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use walkpool_walker::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = WalkConfig::new()
//!         .with_root("./docs")
//!         .with_pattern("**/*.txt")
//!         .with_concurrency(8);
//!
//!     let options = WalkOptions::new(config).on_progress(|snapshot| async move {
//!         println!("{} of {} files done", snapshot.processed, snapshot.total);
//!         Ok(())
//!     });
//!
//!     walk(options, |ctx| async move {
//!         let text = ctx.read().await?;
//!         ctx.write(&text.to_uppercase()).await?;
//!         Ok(())
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod context;
pub mod engine;
pub mod executor;
pub mod filter;
pub mod hooks;
pub mod progress;
pub mod resolver;
pub mod storage;

pub use crate::context::FileContext;
pub use crate::engine::{Walk, WalkConfig, WalkHandle, WalkOptions, walk, walk_with};

/// Re-export commonly used types and traits.
pub mod prelude {
    // Engine
    pub use crate::context::FileContext;
    pub use crate::engine::{Walk, WalkConfig, WalkHandle, WalkOptions, walk, walk_with};
    pub use crate::hooks::{HookEvent, HookRegistry};

    // Collaborators
    pub use crate::filter::{GlobMatcher, IgnoreRule};
    pub use crate::resolver::{FixedFileSet, GlobResolver};
    pub use crate::storage::{LocalFileStore, MemoryFileStore};

    // Core types
    pub use walkpool_core::prelude::*;
}

/// Version information for the walkpool walker library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
