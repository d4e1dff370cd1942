//! Collaborator traits consumed by the walk engine.
//!
//! The engine never touches the filesystem directly: file discovery goes
//! through a [`FileResolver`] and text I/O through a [`FileStore`]. Default
//! implementations live in `walkpool-walker`.

pub mod resolver;
pub mod storage;

pub use resolver::FileResolver;
pub use storage::FileStore;
