//! Lifecycle hooks fired around a walk.
//!
//! Hooks are registered per [`HookEvent`]. Triggering an event runs every
//! callback for it concurrently and waits for all of them, so `start`
//! callbacks finish before the first file task begins and `end`/`progress`
//! callbacks only begin after the last task has settled.

use anyhow::anyhow;
use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, warn};

use walkpool_core::{ProgressSnapshot, Result, WalkError};

use crate::engine::WalkHandle;
use crate::executor::panic_message;

/// Points in a run where hooks fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    /// After files are resolved, before any task runs.
    Start,
    /// After every task has settled.
    End,
    /// After `End`, with the merged settings and final counters.
    Progress,
}

impl HookEvent {
    /// Event name as used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Progress => "progress",
        }
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback for [`HookEvent::Start`] and [`HookEvent::End`].
pub type LifecycleHook<D> =
    Arc<dyn Fn(WalkHandle<D>) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Callback for [`HookEvent::Progress`].
pub type ProgressHook =
    Arc<dyn Fn(ProgressSnapshot) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Registered hooks, grouped by event.
pub struct HookRegistry<D> {
    start: Vec<LifecycleHook<D>>,
    end: Vec<LifecycleHook<D>>,
    progress: Vec<ProgressHook>,
}

impl<D> fmt::Debug for HookRegistry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("start", &format!("{} hooks", self.start.len()))
            .field("end", &format!("{} hooks", self.end.len()))
            .field("progress", &format!("{} hooks", self.progress.len()))
            .finish()
    }
}

impl<D> Default for HookRegistry<D> {
    fn default() -> Self {
        Self {
            start: Vec::new(),
            end: Vec::new(),
            progress: Vec::new(),
        }
    }
}

impl<D> Clone for HookRegistry<D> {
    fn clone(&self) -> Self {
        Self {
            start: self.start.clone(),
            end: self.end.clone(),
            progress: self.progress.clone(),
        }
    }
}

impl<D: Send + Sync + 'static> HookRegistry<D> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a callback for [`HookEvent::Start`].
    pub fn on_start<F, Fut>(&mut self, callback: F)
    where
        F: Fn(WalkHandle<D>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.start.push(boxed_lifecycle(callback));
    }

    /// Append a callback for [`HookEvent::End`].
    pub fn on_end<F, Fut>(&mut self, callback: F)
    where
        F: Fn(WalkHandle<D>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.end.push(boxed_lifecycle(callback));
    }

    /// Append a callback for [`HookEvent::Progress`].
    pub fn on_progress<F, Fut>(&mut self, callback: F)
    where
        F: Fn(ProgressSnapshot) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.progress.push(Arc::new(
            move |snapshot| -> BoxFuture<'static, anyhow::Result<()>> {
                Box::pin(callback(snapshot))
            },
        ));
    }

    /// Append an already boxed lifecycle callback.
    ///
    /// Progress callbacks take a different payload; registering a lifecycle
    /// callback for [`HookEvent::Progress`] is a configuration error.
    pub fn register(&mut self, event: HookEvent, hook: LifecycleHook<D>) -> Result<()> {
        match event {
            HookEvent::Start => self.start.push(hook),
            HookEvent::End => self.end.push(hook),
            HookEvent::Progress => {
                return Err(WalkError::configuration(
                    "progress hooks receive a snapshot; use register_progress",
                ));
            }
        }
        Ok(())
    }

    /// Append an already boxed progress callback.
    pub fn register_progress(&mut self, hook: ProgressHook) {
        self.progress.push(hook);
    }

    /// Number of callbacks registered for `event`.
    pub fn len(&self, event: HookEvent) -> usize {
        match event {
            HookEvent::Start => self.start.len(),
            HookEvent::End => self.end.len(),
            HookEvent::Progress => self.progress.len(),
        }
    }

    /// Whether no callbacks are registered at all.
    pub fn is_empty(&self) -> bool {
        self.start.is_empty() && self.end.is_empty() && self.progress.is_empty()
    }

    /// Run every lifecycle callback for `event` and wait for all of them.
    ///
    /// Returns the number of callbacks that failed or panicked. Failures are
    /// logged and do not stop the remaining callbacks.
    pub async fn trigger(&self, event: HookEvent, walk: &WalkHandle<D>) -> usize {
        let hooks = match event {
            HookEvent::Start => &self.start,
            HookEvent::End => &self.end,
            HookEvent::Progress => return 0,
        };

        debug!("Triggering {} '{}' hooks", hooks.len(), event);
        let results = join_all(hooks.iter().map(|hook| {
            let hook = Arc::clone(hook);
            let walk = walk.clone();
            guarded(async move { hook(walk).await })
        }))
        .await;
        count_failures(event, results)
    }

    /// Run every progress callback with `snapshot` and wait for all of them.
    pub async fn trigger_progress(&self, snapshot: &ProgressSnapshot) -> usize {
        debug!("Triggering {} 'progress' hooks", self.progress.len());
        let results = join_all(self.progress.iter().map(|hook| {
            let hook = Arc::clone(hook);
            let snapshot = snapshot.clone();
            guarded(async move { hook(snapshot).await })
        }))
        .await;
        count_failures(HookEvent::Progress, results)
    }
}

fn boxed_lifecycle<D, F, Fut>(callback: F) -> LifecycleHook<D>
where
    F: Fn(WalkHandle<D>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |walk| -> BoxFuture<'static, anyhow::Result<()>> {
        Box::pin(callback(walk))
    })
}

/// Await a hook, reporting a panic as an error.
async fn guarded<Fut>(hook: Fut) -> anyhow::Result<()>
where
    Fut: Future<Output = anyhow::Result<()>>,
{
    AssertUnwindSafe(hook)
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(anyhow!("panicked: {}", panic_message(payload.as_ref()))))
}

fn count_failures(event: HookEvent, results: Vec<anyhow::Result<()>>) -> usize {
    let mut failures = 0;
    for (index, result) in results.into_iter().enumerate() {
        if let Err(e) = result {
            warn!("Hook {} for '{}' failed: {:#}", index, event, e);
            failures += 1;
        }
    }
    failures
}
