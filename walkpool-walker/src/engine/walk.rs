//! The walk engine.

use chrono::Utc;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use walkpool_core::{
    FileFailure, FileResolver, FileStore, ProgressSnapshot, Result, WalkError, WalkProgress,
    WalkReport, WalkSettings,
};

use super::WalkConfig;
use crate::context::FileContext;
use crate::executor::{BoundedExecutor, TaskOutcome};
use crate::hooks::{HookEvent, HookRegistry};
use crate::progress::ProgressTracker;
use crate::resolver::GlobResolver;
use crate::storage::LocalFileStore;

struct WalkShared<D> {
    config: WalkConfig,
    progress: ProgressTracker,
    data: D,
    running: AtomicBool,
}

/// Shared, read-only view of a walk.
///
/// Handed to lifecycle hooks and reachable from every [`FileContext`].
/// Cloning is cheap.
pub struct WalkHandle<D = ()> {
    shared: Arc<WalkShared<D>>,
}

impl<D> WalkHandle<D> {
    /// Current counters.
    pub fn progress(&self) -> WalkProgress {
        self.shared.progress.snapshot()
    }

    /// User data attached to the walk.
    pub fn data(&self) -> &D {
        &self.shared.data
    }

    /// The walk configuration.
    pub fn config(&self) -> &WalkConfig {
        &self.shared.config
    }

    /// The walk configuration in its serializable form.
    pub fn settings(&self) -> WalkSettings {
        self.shared.config.settings()
    }

    /// Whether a run is in flight.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }
}

impl<D> Clone for WalkHandle<D> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<D> fmt::Debug for WalkHandle<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkHandle")
            .field("config", &self.shared.config)
            .field("progress", &self.progress())
            .finish_non_exhaustive()
    }
}

/// Resolves a file set and runs a processor over it with bounded concurrency.
///
/// A `Walk` can be run any number of times, one run at a time. Each run
/// resets the counters. Per-file failures are counted and reported, never
/// returned; only configuration, resolution and timeout errors fail a run.
///
/// # Examples
///
/// ```rust,no_run
/// use walkpool_walker::engine::{Walk, WalkConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut walk = Walk::new(
///         WalkConfig::new()
///             .with_root("./notes")
///             .with_pattern("**/*.md")
///             .with_concurrency(4),
///     );
///     walk.on_end(|walk| async move {
///         println!("{:?}", walk.progress());
///         Ok(())
///     });
///
///     let lengths = walk
///         .run(|ctx| async move { Ok(ctx.read().await?.len()) })
///         .await?;
///     println!("read {} files", lengths.len());
///     Ok(())
/// }
/// ```
pub struct Walk<D = ()> {
    shared: Arc<WalkShared<D>>,
    hooks: HookRegistry<D>,
    resolver: Arc<dyn FileResolver>,
    store: Arc<dyn FileStore>,
}

impl Walk<()> {
    /// Create a walk without user data.
    #[must_use]
    pub fn new(config: WalkConfig) -> Self {
        Self::with_data(config, ())
    }
}

impl<D: Send + Sync + 'static> Walk<D> {
    /// Create a walk carrying `data`, reachable from hooks and contexts.
    pub fn with_data(config: WalkConfig, data: D) -> Self {
        Self {
            shared: Arc::new(WalkShared {
                config,
                progress: ProgressTracker::new(),
                data,
                running: AtomicBool::new(false),
            }),
            hooks: HookRegistry::new(),
            resolver: Arc::new(GlobResolver::new()),
            store: Arc::new(LocalFileStore::new()),
        }
    }

    /// Replace the file resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn FileResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the file store used by contexts.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn FileStore>) -> Self {
        self.store = store;
        self
    }

    /// Replace the hook registry.
    #[must_use]
    pub fn with_hooks(mut self, hooks: HookRegistry<D>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Register a callback fired after resolution, before any file runs.
    pub fn on_start<F, Fut>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(WalkHandle<D>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.hooks.on_start(callback);
        self
    }

    /// Register a callback fired after every file has settled.
    pub fn on_end<F, Fut>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(WalkHandle<D>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.hooks.on_end(callback);
        self
    }

    /// Register a callback fired once after `end` with the final counters.
    pub fn on_progress<F, Fut>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(ProgressSnapshot) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.hooks.on_progress(callback);
        self
    }

    /// Mutable access to the hook registry.
    pub fn hooks_mut(&mut self) -> &mut HookRegistry<D> {
        &mut self.hooks
    }

    /// A handle sharing this walk's counters and data.
    pub fn handle(&self) -> WalkHandle<D> {
        WalkHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Current counters.
    pub fn progress(&self) -> WalkProgress {
        self.shared.progress.snapshot()
    }

    /// User data attached to the walk.
    pub fn data(&self) -> &D {
        &self.shared.data
    }

    /// The walk configuration.
    pub fn config(&self) -> &WalkConfig {
        &self.shared.config
    }

    /// Run `processor` over every resolved file and return the successful
    /// results in resolution order.
    pub async fn run<F, Fut, T>(&self, processor: F) -> Result<Vec<T>>
    where
        F: Fn(FileContext<D>) -> Fut + Send + Sync,
        Fut: Future<Output = anyhow::Result<T>> + Send,
    {
        self.run_report(processor).await.map(WalkReport::into_results)
    }

    /// Like [`Walk::run`], returning the full report.
    pub async fn run_report<F, Fut, T>(&self, processor: F) -> Result<WalkReport<T>>
    where
        F: Fn(FileContext<D>) -> Fut + Send + Sync,
        Fut: Future<Output = anyhow::Result<T>> + Send,
    {
        let _guard = RunGuard::acquire(&self.shared.running)?;
        let config = &self.shared.config;
        config.validate()?;

        match config.timeout {
            Some(limit) => tokio::time::timeout(limit, self.execute(&processor))
                .await
                .map_err(|_| {
                    warn!(
                        "Walk of {} timed out after {:?}",
                        config.root.display(),
                        limit
                    );
                    WalkError::timeout(format!("walk exceeded {limit:?}"))
                })?,
            None => self.execute(&processor).await,
        }
    }

    async fn execute<F, Fut, T>(&self, processor: &F) -> Result<WalkReport<T>>
    where
        F: Fn(FileContext<D>) -> Fut + Send + Sync,
        Fut: Future<Output = anyhow::Result<T>> + Send,
    {
        let config = &self.shared.config;
        let progress = &self.shared.progress;
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let started = Instant::now();

        let files = self.resolver.resolve(&config.root, &config.pattern).await?;
        progress.begin(files.len());
        info!(
            "Walk {} starting: {} files under {} (concurrency {})",
            run_id,
            files.len(),
            config.root.display(),
            config.concurrency
        );

        let handle = self.handle();
        self.hooks.trigger(HookEvent::Start, &handle).await;

        let executor = BoundedExecutor::new(config.concurrency)?;
        let tasks = files
            .iter()
            .cloned()
            .map(|path: PathBuf| self.process_file(path, processor).boxed());
        let outcomes = executor
            .execute_with(tasks, |index, outcome| match outcome {
                TaskOutcome::Succeeded(_) => {
                    progress.record_success();
                }
                TaskOutcome::Failed(err) => {
                    progress.record_failure();
                    warn!("Failed to process {}: {}", files[index].display(), err);
                }
                TaskOutcome::Skipped => {
                    progress.record_ignored();
                }
            })
            .await;

        self.hooks.trigger(HookEvent::End, &handle).await;
        let final_progress = progress.snapshot();
        self.hooks
            .trigger_progress(&ProgressSnapshot::new(config.settings(), final_progress))
            .await;

        let mut results = Vec::with_capacity(final_progress.success);
        let mut failures = Vec::with_capacity(final_progress.failed);
        for (path, outcome) in files.into_iter().zip(outcomes) {
            match outcome {
                TaskOutcome::Succeeded(value) => results.push(value),
                TaskOutcome::Failed(err) => failures.push(FileFailure {
                    path,
                    error: err.to_string(),
                }),
                TaskOutcome::Skipped => {}
            }
        }

        let elapsed = started.elapsed();
        info!(
            "Walk {} finished in {:?}: {} succeeded, {} failed, {} ignored",
            run_id, elapsed, final_progress.success, final_progress.failed, final_progress.ignored
        );

        Ok(WalkReport {
            run_id,
            started_at,
            elapsed,
            progress: final_progress,
            results,
            failures,
        })
    }

    async fn process_file<F, Fut, T>(&self, path: PathBuf, processor: &F) -> TaskOutcome<T>
    where
        F: Fn(FileContext<D>) -> Fut + Sync,
        Fut: Future<Output = anyhow::Result<T>> + Send,
    {
        if self.shared.config.ignore.should_ignore(&path) {
            debug!("Ignoring {}", path.display());
            return TaskOutcome::Skipped;
        }

        debug!("Processing {}", path.display());
        let context = FileContext::new(path.clone(), Arc::clone(&self.store), self.handle());
        match processor(context).await {
            Ok(value) => TaskOutcome::Succeeded(value),
            Err(err) => TaskOutcome::Failed(into_walk_error(&path, err)),
        }
    }
}

impl<D> fmt::Debug for Walk<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Walk")
            .field("config", &self.shared.config)
            .field("hooks", &self.hooks)
            .field("resolver", &self.resolver.name())
            .field("store", &self.store.name())
            .finish_non_exhaustive()
    }
}

/// Keep typed errors raised through `?` on store calls, wrap everything else.
fn into_walk_error(path: &Path, err: anyhow::Error) -> WalkError {
    match err.downcast::<WalkError>() {
        Ok(err) => err,
        Err(err) => WalkError::processor(path, format!("{err:#}")),
    }
}

/// Marks a walk as running until dropped.
struct RunGuard<'a> {
    running: &'a AtomicBool,
}

impl<'a> RunGuard<'a> {
    fn acquire(running: &'a AtomicBool) -> Result<Self> {
        running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| WalkError::configuration("Walk is already running"))?;
        Ok(Self { running })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
