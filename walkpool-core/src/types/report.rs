//! Detailed results of a walk run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::WalkProgress;

/// One file that failed during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    /// The file that failed.
    pub path: PathBuf,
    /// Rendered error message.
    pub error: String,
}

/// Everything a run produced.
///
/// `results` holds the processor return values of successful files, in the
/// order the files were resolved.
#[derive(Debug, Clone)]
pub struct WalkReport<T> {
    /// Unique identifier of this run.
    pub run_id: uuid::Uuid,
    /// When the run started.
    pub started_at: chrono::DateTime<chrono::Utc>,
    /// Wall-clock duration of the run, hooks included.
    pub elapsed: Duration,
    /// Final counters.
    pub progress: WalkProgress,
    /// Successful processor results in resolution order.
    pub results: Vec<T>,
    /// Failed files in resolution order.
    pub failures: Vec<FileFailure>,
}

impl<T> WalkReport<T> {
    /// Whether every processed file succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Drop the bookkeeping and keep the results.
    #[must_use]
    pub fn into_results(self) -> Vec<T> {
        self.results
    }
}
