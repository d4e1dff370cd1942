//! Bounded-concurrency task execution.
//!
//! [`BoundedExecutor`] runs a fixed list of tasks with at most `limit` in
//! flight. A slot is refilled as soon as any task settles. Each task's
//! outcome is captured on its own: an error or a panic in one task never
//! affects the others.

use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error};

use walkpool_core::{Result, WalkError};

/// How a single task settled.
#[derive(Debug)]
pub enum TaskOutcome<T> {
    /// The task produced a value.
    Succeeded(T),
    /// The task failed or panicked.
    Failed(WalkError),
    /// The task decided not to run.
    Skipped,
}

impl<T> TaskOutcome<T> {
    /// Whether the task produced a value.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// Whether the task failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The task's error, if it failed.
    pub fn error(&self) -> Option<&WalkError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// The task's value, if it succeeded.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }
}

/// Runs tasks with a global concurrency ceiling.
///
/// Tasks are polled on the caller's task, so suspension points inside them
/// (I/O, timers) are where other tasks make progress.
///
/// # Examples
///
/// ```rust,no_run
/// use walkpool_walker::executor::{BoundedExecutor, TaskOutcome};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let executor = BoundedExecutor::new(2)?;
///     let outcomes = executor
///         .execute((1..=4).map(|n| async move { TaskOutcome::Succeeded(n * 10) }))
///         .await;
///
///     let values: Vec<_> = outcomes.into_iter().filter_map(TaskOutcome::into_value).collect();
///     assert_eq!(values, vec![10, 20, 30, 40]);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BoundedExecutor {
    limit: usize,
}

impl BoundedExecutor {
    /// Create an executor admitting at most `limit` concurrent tasks.
    pub fn new(limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(WalkError::configuration(
                "Concurrency must be greater than 0",
            ));
        }
        Ok(Self { limit })
    }

    /// The concurrency ceiling.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Run every task and return their outcomes in input order.
    pub async fn execute<I, Fut, T>(&self, tasks: I) -> Vec<TaskOutcome<T>>
    where
        I: IntoIterator<Item = Fut>,
        Fut: Future<Output = TaskOutcome<T>>,
    {
        self.execute_with(tasks, |_, _| {}).await
    }

    /// Run every task, calling `on_settle` with the task's input index and
    /// outcome as each one settles.
    ///
    /// `on_settle` runs in completion order, once per task, before the
    /// executor returns. Outcomes are returned in input order.
    pub async fn execute_with<I, Fut, T, F>(&self, tasks: I, mut on_settle: F) -> Vec<TaskOutcome<T>>
    where
        I: IntoIterator<Item = Fut>,
        Fut: Future<Output = TaskOutcome<T>>,
        F: FnMut(usize, &TaskOutcome<T>),
    {
        let mut pending = tasks.into_iter().enumerate();
        let mut slots: Vec<Option<TaskOutcome<T>>> = Vec::with_capacity(pending.size_hint().0);

        let mut in_flight = FuturesUnordered::new();
        for (index, task) in pending.by_ref().take(self.limit) {
            in_flight.push(settle(index, task));
        }

        while let Some((index, outcome)) = in_flight.next().await {
            if let Some((next, task)) = pending.next() {
                in_flight.push(settle(next, task));
            }
            on_settle(index, &outcome);
            if slots.len() <= index {
                slots.resize_with(index + 1, || None);
            }
            slots[index] = Some(outcome);
        }

        debug!("Executor settled {} tasks", slots.len());
        slots.into_iter().flatten().collect()
    }
}

/// Await one task, turning a panic into a failed outcome.
async fn settle<Fut, T>(index: usize, task: Fut) -> (usize, TaskOutcome<T>)
where
    Fut: Future<Output = TaskOutcome<T>>,
{
    let outcome = AssertUnwindSafe(task)
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            error!("Task {} panicked: {}", index, message);
            TaskOutcome::Failed(WalkError::task_panicked(message))
        });
    (index, outcome)
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
