//! Progress counters and end-of-run snapshots.

use serde::{Deserialize, Serialize};

use crate::config::WalkSettings;

/// Point-in-time view of a walk's counters.
///
/// `total` is fixed once files are resolved. Ignored files count towards
/// `total` but never towards `success` or `failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkProgress {
    /// Number of resolved files.
    pub total: usize,
    /// Files whose processor completed successfully.
    pub success: usize,
    /// Files whose read, write, or processor failed.
    pub failed: usize,
    /// Files skipped by the ignore filter.
    pub ignored: usize,
}

impl WalkProgress {
    /// Files that ran through the processor, successfully or not.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.success + self.failed
    }

    /// Files that have not settled yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total
            .saturating_sub(self.processed())
            .saturating_sub(self.ignored)
    }

    /// Whether every resolved file has settled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    /// Whether at least one file failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Payload of the `progress` hook: the run's settings merged with its final
/// counters.
///
/// Serializes flat, so `root`, `pattern`, and `concurrency` sit next to
/// `processed`, `total`, `success`, and `failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Settings the run was started with.
    #[serde(flatten)]
    pub settings: WalkSettings,
    /// `success + failed` at snapshot time.
    pub processed: usize,
    /// Number of resolved files.
    pub total: usize,
    /// Successful files.
    pub success: usize,
    /// Failed files.
    pub failed: usize,
    /// Ignored files.
    pub ignored: usize,
}

impl ProgressSnapshot {
    /// Merge settings with a progress reading.
    pub fn new(settings: WalkSettings, progress: WalkProgress) -> Self {
        Self {
            settings,
            processed: progress.processed(),
            total: progress.total,
            success: progress.success,
            failed: progress.failed,
            ignored: progress.ignored,
        }
    }

    /// The counters without the settings.
    #[must_use]
    pub fn progress(&self) -> WalkProgress {
        WalkProgress {
            total: self.total,
            success: self.success,
            failed: self.failed,
            ignored: self.ignored,
        }
    }
}
