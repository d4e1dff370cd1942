//! One-call entry points over [`Walk`].

use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use walkpool_core::{ProgressSnapshot, Result, WalkError};

use super::{Walk, WalkConfig, WalkHandle};
use crate::context::FileContext;
use crate::hooks::HookRegistry;

/// A type-erased file processor.
pub type BoxedProcessor<T, D> =
    Arc<dyn Fn(FileContext<D>) -> BoxFuture<'static, anyhow::Result<T>> + Send + Sync>;

/// Everything needed to run a walk in one call.
pub struct WalkOptions<T, D = ()> {
    /// Walk configuration.
    pub config: WalkConfig,
    data: D,
    exec: Option<BoxedProcessor<T, D>>,
    hooks: HookRegistry<D>,
}

impl<T> WalkOptions<T, ()> {
    /// Options without user data.
    #[must_use]
    pub fn new(config: WalkConfig) -> Self {
        Self::with_data(config, ())
    }
}

impl<T, D: Send + Sync + 'static> WalkOptions<T, D> {
    /// Options carrying user data.
    pub fn with_data(config: WalkConfig, data: D) -> Self {
        Self {
            config,
            data,
            exec: None,
            hooks: HookRegistry::new(),
        }
    }

    /// Set the processor.
    #[must_use]
    pub fn exec<F, Fut>(mut self, processor: F) -> Self
    where
        F: Fn(FileContext<D>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        self.exec = Some(Arc::new(
            move |ctx| -> BoxFuture<'static, anyhow::Result<T>> { Box::pin(processor(ctx)) },
        ));
        self
    }

    /// Add a `start` hook.
    #[must_use]
    pub fn on_start<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(WalkHandle<D>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.hooks.on_start(callback);
        self
    }

    /// Add an `end` hook.
    #[must_use]
    pub fn on_end<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(WalkHandle<D>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.hooks.on_end(callback);
        self
    }

    /// Add a `progress` hook.
    #[must_use]
    pub fn on_progress<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressSnapshot) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.hooks.on_progress(callback);
        self
    }

    /// Whether a processor has been set.
    pub fn has_exec(&self) -> bool {
        self.exec.is_some()
    }
}

impl<T, D> fmt::Debug for WalkOptions<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkOptions")
            .field("config", &self.config)
            .field("exec", &self.exec.is_some())
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

/// Run a walk with the processor set through [`WalkOptions::exec`].
///
/// Fails with a configuration error before touching the filesystem when no
/// processor was set.
pub async fn walk_with<T, D>(options: WalkOptions<T, D>) -> Result<Vec<T>>
where
    D: Send + Sync + 'static,
{
    let WalkOptions {
        config,
        data,
        exec,
        hooks,
    } = options;
    let exec = exec.ok_or_else(|| WalkError::configuration("Missing processor"))?;

    Walk::with_data(config, data)
        .with_hooks(hooks)
        .run(move |ctx| exec(ctx))
        .await
}

/// Run a walk with `processor`, which replaces any processor in `options`.
///
/// # Examples
///
/// ```rust,no_run
/// use walkpool_walker::engine::{WalkConfig, WalkOptions, walk};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let options = WalkOptions::new(WalkConfig::new().with_pattern("*.txt"));
///     let sizes = walk(options, |ctx| async move { Ok(ctx.read().await?.len()) }).await?;
///     println!("{sizes:?}");
///     Ok(())
/// }
/// ```
pub async fn walk<T, D, F, Fut>(options: WalkOptions<T, D>, processor: F) -> Result<Vec<T>>
where
    D: Send + Sync + 'static,
    F: Fn(FileContext<D>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
{
    walk_with(options.exec(processor)).await
}
