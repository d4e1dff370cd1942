//! Text file stores.
//!
//! [`LocalFileStore`] talks to the real filesystem through `tokio::fs`;
//! [`MemoryFileStore`] keeps files in a map, for tests and dry runs.

pub mod local;
pub mod memory;

pub use local::LocalFileStore;
pub use memory::MemoryFileStore;
