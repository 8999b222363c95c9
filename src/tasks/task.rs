//! # Task abstraction.
//!
//! This module defines the [`Task`] trait (async, cancelable) and the common
//! handle type [`TaskRef`], an `Arc<dyn Task>` suitable for sharing across
//! the harness.
//!
//! A task receives a [`CancellationToken`] and should periodically check it
//! to stop cooperatively when the harness cancels it (fail-fast fan-out, or
//! a supervisor configured to cancel at the deadline).

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;

/// Shared handle to a task.
pub type TaskRef = Arc<dyn Task>;

/// # Asynchronous, cancelable unit of work.
///
/// A `Task` has a stable [`name`](Task::name) and an async
/// [`run`](Task::run) method that receives a [`CancellationToken`] and
/// produces exactly one payload or fails exactly once. Tasks must not share
/// mutable state with each other — that independence is what makes
/// concurrent fan-out safe without locks.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use taskrace::{Task, TaskError};
///
/// struct Demo;
///
/// #[async_trait]
/// impl Task for Demo {
///     fn name(&self) -> &str { "demo" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<String, TaskError> {
///         if ctx.is_cancelled() {
///             return Err(TaskError::Canceled);
///         }
///         Ok("demo result".to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Executes the task until completion, failure, or cancellation.
    ///
    /// Implementations that sleep or wait should select on
    /// `ctx.cancelled()` and return [`TaskError::Canceled`] promptly when
    /// the harness cancels them.
    async fn run(&self, ctx: CancellationToken) -> Result<String, TaskError>;
}
