//! File set resolvers.
//!
//! Implementations of [`FileResolver`](walkpool_core::FileResolver) that turn
//! a root and a pattern into the ordered list of files a walk processes.

pub mod fixed;
pub mod glob;

pub use fixed::FixedFileSet;
pub use glob::GlobResolver;
