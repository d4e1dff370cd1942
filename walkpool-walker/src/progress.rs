//! Lock-free progress accounting shared by in-flight tasks.

use std::sync::atomic::{AtomicUsize, Ordering};

use walkpool_core::WalkProgress;

/// Atomic counters for one run.
///
/// [`ProgressTracker::begin`] fixes the total and clears the counters before
/// any task starts; after that the counters only ever grow.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    total: AtomicUsize,
    success: AtomicUsize,
    failed: AtomicUsize,
    ignored: AtomicUsize,
}

impl ProgressTracker {
    /// Create a tracker with all counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run over `total` resolved files.
    pub fn begin(&self, total: usize) {
        self.success.store(0, Ordering::SeqCst);
        self.failed.store(0, Ordering::SeqCst);
        self.ignored.store(0, Ordering::SeqCst);
        self.total.store(total, Ordering::SeqCst);
    }

    /// Count a successful file. Returns the new success count.
    pub fn record_success(&self) -> usize {
        self.success.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Count a failed file. Returns the new failure count.
    pub fn record_failure(&self) -> usize {
        self.failed.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Count an ignored file. Returns the new ignored count.
    pub fn record_ignored(&self) -> usize {
        self.ignored.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Read the current counters.
    pub fn snapshot(&self) -> WalkProgress {
        WalkProgress {
            total: self.total.load(Ordering::SeqCst),
            success: self.success.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            ignored: self.ignored.load(Ordering::SeqCst),
        }
    }
}
