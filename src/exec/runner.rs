//! # Run one task execution behind a panic boundary.
//!
//! [`run_guarded`] is the single place where a task actually runs. It
//! installs a catch-unwind boundary at the task's root, measures the task's
//! running time, and publishes lifecycle events to the [`Bus`].
//!
//! ## Event flow
//!
//! ```text
//! Success:
//!   task.run() → Ok(payload)        → publish TaskCompleted (with elapsed)
//!
//! Domain failure / cancellation:
//!   task.run() → Err(Fail/Canceled) → publish TaskFailed
//!
//! Abnormal termination:
//!   task.run() → panic → caught     → publish TaskPanicked
//!                                   → return Err(Panicked)
//! ```
//!
//! ## Rules
//! - Always publishes **exactly one** terminal event per execution.
//! - A panic never unwinds out of `run_guarded`; it is converted to
//!   [`TaskError::Panicked`] and delivered through the same `Result` channel
//!   as a normal failing completion. This holds even when the caller has
//!   already abandoned the execution: the boundary swallows the unwind
//!   wherever the future happens to be polled.
//! - Elapsed time is measured here (start → end of the run), never taken
//!   from the task itself.

use futures::FutureExt;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{
    error::TaskError,
    events::{Bus, Event, EventKind},
    tasks::TaskRef,
};

/// Executes `task` once with a panic boundary at its root, publishing
/// lifecycle events to `bus`.
///
/// Returns the task's payload on success, or the typed failure — including
/// [`TaskError::Panicked`] for an abnormal termination.
pub(crate) async fn run_guarded(
    task: TaskRef,
    ctx: CancellationToken,
    bus: Bus,
) -> Result<String, TaskError> {
    bus.publish(Event::new(EventKind::TaskStarting).with_task(task.name()));
    let started = Instant::now();

    let res = match std::panic::AssertUnwindSafe(task.run(ctx)).catch_unwind().await {
        Ok(r) => r,
        Err(payload) => Err(TaskError::from_panic(payload)),
    };

    match &res {
        Ok(_) => {
            bus.publish(
                Event::new(EventKind::TaskCompleted)
                    .with_task(task.name())
                    .with_elapsed(started.elapsed()),
            );
        }
        Err(TaskError::Panicked { message }) => {
            bus.publish(
                Event::new(EventKind::TaskPanicked)
                    .with_task(task.name())
                    .with_reason(message.clone()),
            );
        }
        Err(e) => {
            bus.publish(
                Event::new(EventKind::TaskFailed)
                    .with_task(task.name())
                    .with_reason(e.as_message()),
            );
        }
    }

    res
}
