//! Walk engine: configuration, the [`Walk`] runner and one-call entry points.
//!
//! A run moves through resolution, the `start` hooks, bounded execution of
//! one task per file, then the `end` and `progress` hooks. Successful results
//! come back in resolution order.

pub mod config;
pub mod options;
pub mod walk;

pub use config::WalkConfig;
pub use options::{BoxedProcessor, WalkOptions, walk, walk_with};
pub use walk::{Walk, WalkHandle};
