//! # DeadlineSupervisor: race one task against a hard deadline.
//!
//! Runs exactly one task on its own tokio task (an isolated execution
//! context with a panic boundary at its root) and races it against a timer.
//! Whichever resolves first decides the call's outcome; the other signal is
//! discarded. Exactly one outcome is returned per call, and the supervisor
//! never waits past the deadline.
//!
//! ## Outcomes
//! ```text
//! task completes first   → Ok(TaskReport) or the task's Err (Fail, ...)
//! task panics first      → Err(Panicked)   — before the deadline, not after
//! deadline fires first   → Err(Timeout)    — the task is ABANDONED: its
//!                          join handle is dropped, it keeps running
//!                          detached, and a late completion or crash is
//!                          swallowed by the panic boundary, never delivered
//! ```
//!
//! Abandonment models an external enforcement boundary (a platform-imposed
//! hard kill of the overrunning worker) that the supervisor does not itself
//! perform. With [`Config::cancel_on_deadline`](crate::Config) set, the
//! supervisor instead cancels the task's token at the deadline; a task that
//! ignores the token and finishes or crashes later is still discarded.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::{
    error::TaskError,
    events::{Bus, Event, EventKind},
    exec::runner::run_guarded,
    report::TaskReport,
    tasks::TaskRef,
};

/// State of one supervised call: `Pending -> {Completed, TimedOut}`.
/// `TimedOut` is terminal for the call regardless of what the abandoned
/// task later does.
pub struct DeadlineSupervisor {
    bus: Bus,
    cancel_on_deadline: bool,
}

impl DeadlineSupervisor {
    /// Creates a supervisor publishing lifecycle events to `bus`.
    ///
    /// `cancel_on_deadline` selects the timeout behavior: `false` abandons
    /// the task (default harness configuration), `true` cancels its token.
    pub fn new(bus: Bus, cancel_on_deadline: bool) -> Self {
        Self {
            bus,
            cancel_on_deadline,
        }
    }

    /// Races `task` against `deadline` and returns whichever finishes first.
    ///
    /// ### Guarantees
    /// - Exactly one outcome per call; no double delivery.
    /// - Returns within `deadline` plus the cost of observing the readiness
    ///   signals — never blocks on the task after the deadline fires.
    /// - An abnormal termination of the task is converted to
    ///   [`TaskError::Panicked`] at the isolation boundary and never unwinds
    ///   into the caller, even when it happens after the deadline already
    ///   fired.
    /// - `elapsed` in a success report is measured by the supervisor.
    pub async fn run_with_deadline(
        &self,
        task: TaskRef,
        deadline: Duration,
    ) -> Result<TaskReport, TaskError> {
        let started = Instant::now();
        let name: Arc<str> = Arc::from(task.name());
        let ctx = CancellationToken::new();
        let mut worker = tokio::spawn(run_guarded(task, ctx.clone(), self.bus.clone()));

        let timer = time::sleep(deadline);
        tokio::pin!(timer);

        tokio::select! {
            joined = &mut worker => {
                let elapsed = started.elapsed();
                match joined {
                    Ok(Ok(payload)) => Ok(TaskReport::new(payload, elapsed)),
                    Ok(Err(err)) => Err(err),
                    // run_guarded converts panics inside the worker, so a
                    // join error here means the runtime tore the worker down.
                    Err(join_err) => Err(TaskError::Panicked {
                        message: join_err.to_string(),
                    }),
                }
            }
            _ = &mut timer => {
                self.bus.publish(
                    Event::new(EventKind::DeadlineHit)
                        .with_task(Arc::clone(&name))
                        .with_deadline(deadline),
                );
                if self.cancel_on_deadline {
                    ctx.cancel();
                } else {
                    // Dropping the join handle detaches the worker: it keeps
                    // running in the background until it completes or
                    // crashes, and either ending is swallowed.
                    self.bus.publish(
                        Event::new(EventKind::TaskAbandoned)
                            .with_task(name)
                            .with_deadline(deadline),
                    );
                }
                Err(TaskError::Timeout { deadline })
            }
        }
    }
}
