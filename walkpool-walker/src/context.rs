//! Per-file capability handed to the processor.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkpool_core::{FileStore, Result, WalkProgress};

use crate::engine::WalkHandle;

/// Access to one resolved file for the duration of one processor call.
///
/// The context is passed by value and owned by a single task. Reads go to the
/// store every time; nothing is cached between calls.
pub struct FileContext<D = ()> {
    filepath: PathBuf,
    store: Arc<dyn FileStore>,
    walk: WalkHandle<D>,
}

impl<D> FileContext<D> {
    pub(crate) fn new(filepath: PathBuf, store: Arc<dyn FileStore>, walk: WalkHandle<D>) -> Self {
        Self {
            filepath,
            store,
            walk,
        }
    }

    /// Absolute path of the file.
    pub fn filepath(&self) -> &Path {
        &self.filepath
    }

    /// Read the file as text.
    pub async fn read(&self) -> Result<String> {
        self.store.read(&self.filepath).await
    }

    /// Overwrite the file with `content`.
    pub async fn write(&self, content: &str) -> Result<()> {
        self.store.write(&self.filepath, content).await
    }

    /// Write `content` to `savepath`, leaving the original untouched.
    pub async fn write_to<P: AsRef<Path>>(&self, savepath: P, content: &str) -> Result<()> {
        self.store.write(savepath.as_ref(), content).await
    }

    /// Write to `savepath` when given, otherwise over the original file.
    pub async fn save(&self, content: &str, savepath: Option<&Path>) -> Result<()> {
        match savepath {
            Some(path) => self.write_to(path, content).await,
            None => self.write(content).await,
        }
    }

    /// The walk this file belongs to.
    pub fn walk(&self) -> &WalkHandle<D> {
        &self.walk
    }

    /// User data attached to the walk.
    pub fn data(&self) -> &D {
        self.walk.data()
    }

    /// Live counters of the running walk.
    pub fn progress(&self) -> WalkProgress {
        self.walk.progress()
    }
}

impl<D> fmt::Debug for FileContext<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileContext")
            .field("filepath", &self.filepath)
            .field("store", &self.store.name())
            .finish_non_exhaustive()
    }
}
