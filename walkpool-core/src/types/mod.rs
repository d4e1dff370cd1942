//! Core data types for walkpool.
//!
//! Progress counters, end-of-run snapshots, and walk reports.

pub mod progress;
pub mod report;

// Re-export all types for convenience
pub use progress::*;
pub use report::*;
