//! # FanOutExecutor: concurrent fan-out/fan-in over independent sub-tasks.
//!
//! Runs K independent sub-tasks concurrently, waits for all of them to reach
//! completion, and merges their payloads **in input order** — regardless of
//! completion order. Total elapsed time is bounded by the slowest sub-task,
//! never by the sum.
//!
//! ## Architecture
//! ```text
//! run_all([t0, t1, t2])
//!      │
//!      ├─► spawn run_guarded(t0) ──► slot 0 ─┐
//!      ├─► spawn run_guarded(t1) ──► slot 1 ─┼─► join all ─► merge slots
//!      └─► spawn run_guarded(t2) ──► slot 2 ─┘       in input order
//! ```
//!
//! ## Rules
//! - Each sub-task writes only its **own slot**, identified by input
//!   position; there is no shared accumulator that concurrent finishers
//!   could race on.
//! - **Fail-fast**: the first sub-task failure (domain error or panic) is
//!   recorded, the shared token is cancelled so cooperative siblings exit
//!   early, and it becomes the call's error. Sibling `Canceled`
//!   acknowledgements after that point are discarded.
//! - All sub-tasks are still drained to completion before the call returns,
//!   so exactly one outcome is produced and nothing leaks past the call.
//! - A panicking sub-task never kills its siblings or the executor: panics
//!   are caught at each sub-task's root by
//!   [`run_guarded`](super::runner::run_guarded).

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{
    error::TaskError,
    events::{Bus, Event, EventKind},
    exec::runner::run_guarded,
    report::TaskReport,
    tasks::TaskRef,
};

/// Runs an ordered set of independent sub-tasks concurrently and merges
/// their payloads in input order.
pub struct FanOutExecutor {
    bus: Bus,
}

impl FanOutExecutor {
    /// Creates an executor publishing lifecycle events to `bus`.
    pub fn new(bus: Bus) -> Self {
        Self { bus }
    }

    /// Runs all `tasks` concurrently and waits for every one of them to
    /// finish.
    ///
    /// ### Result
    /// - `Ok(report)`: `report.payload` is the space-joined concatenation of
    ///   sub-task payloads in **input order**; `report.elapsed` is the wall
    ///   time from call entry until the last sub-task finished.
    /// - `Err(first_failure)`: fail-fast — the first failure observed wins,
    ///   the shared token is cancelled, and the remaining sub-tasks are
    ///   drained before returning.
    ///
    /// `tasks` may be empty; the result is an empty payload with ~zero
    /// elapsed time.
    pub async fn run_all(&self, tasks: &[TaskRef]) -> Result<TaskReport, TaskError> {
        let started = Instant::now();
        self.bus
            .publish(Event::new(EventKind::FanOutStarting).with_width(tasks.len()));

        let ctx = CancellationToken::new();
        let mut set: JoinSet<(usize, Result<String, TaskError>)> = JoinSet::new();
        for (slot, task) in tasks.iter().enumerate() {
            let task = Arc::clone(task);
            let child = ctx.child_token();
            let bus = self.bus.clone();
            set.spawn(async move { (slot, run_guarded(task, child, bus).await) });
        }

        let mut slots: Vec<Option<String>> = vec![None; tasks.len()];
        let mut first_failure: Option<TaskError> = None;

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((slot, Ok(payload))) => {
                    slots[slot] = Some(payload);
                }
                Ok((_slot, Err(err))) => {
                    if first_failure.is_none() {
                        first_failure = Some(err);
                        ctx.cancel();
                    }
                }
                Err(join_err) => {
                    // run_guarded catches panics inside the worker, so a
                    // join error here means the runtime tore the worker down.
                    if first_failure.is_none() {
                        first_failure = Some(TaskError::Panicked {
                            message: join_err.to_string(),
                        });
                        ctx.cancel();
                    }
                }
            }
        }

        let elapsed = started.elapsed();
        match first_failure {
            None => {
                let payload = slots
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                self.bus.publish(
                    Event::new(EventKind::FanOutCompleted)
                        .with_width(tasks.len())
                        .with_elapsed(elapsed),
                );
                Ok(TaskReport::new(payload, elapsed))
            }
            Some(err) => {
                self.bus.publish(
                    Event::new(EventKind::FanOutFailed)
                        .with_width(tasks.len())
                        .with_reason(err.as_message())
                        .with_elapsed(elapsed),
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::db_call;
    use crate::tasks::TaskFn;
    use std::time::Duration;
    use tokio::time;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn exec() -> FanOutExecutor {
        FanOutExecutor::new(Bus::new(64))
    }

    #[allow(unreachable_code)]
    fn panicking_task(name: &'static str, delay: Duration, msg: &'static str) -> TaskRef {
        TaskFn::arc(name, move |_ctx| async move {
            time::sleep(delay).await;
            panic!("{msg}");
            Ok(String::new())
        })
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_is_bounded_by_slowest_not_sum() {
        let tasks = vec![
            db_call("a", secs(8), "A"),
            db_call("b", secs(4), "B"),
            db_call("c", secs(9), "C"),
        ];

        let report = exec().run_all(&tasks).await.unwrap();

        assert_eq!(report.payload, "A B C");
        assert!(report.elapsed >= secs(9), "elapsed {:?}", report.elapsed);
        assert!(report.elapsed < secs(10), "elapsed {:?}", report.elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn payload_order_matches_input_not_completion() {
        // Completion order here is c, b, a; payload order must stay a, b, c.
        let tasks = vec![
            db_call("a", secs(9), "'db 1 result set'"),
            db_call("b", secs(5), "'db 2 result set'"),
            db_call("c", secs(1), "'db 3 result set'"),
        ];

        let report = exec().run_all(&tasks).await.unwrap();

        assert_eq!(
            report.payload,
            "'db 1 result set' 'db 2 result set' 'db 3 result set'"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn empty_fan_out_returns_empty_payload() {
        let report = exec().run_all(&[]).await.unwrap();
        assert_eq!(report.payload, "");
        assert!(report.elapsed < Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn first_failure_wins_and_cancels_siblings() {
        let failing: TaskRef = TaskFn::arc("failing", |_ctx| async {
            time::sleep(Duration::from_secs(1)).await;
            Err(TaskError::Fail {
                error: "db 2 unavailable".to_string(),
            })
        });
        let tasks = vec![
            db_call("slow-1", secs(30), "S1"),
            failing,
            db_call("slow-2", secs(30), "S2"),
        ];

        let started = Instant::now();
        let err = exec().run_all(&tasks).await.unwrap_err();

        assert_eq!(
            err,
            TaskError::Fail {
                error: "db 2 unavailable".to_string()
            }
        );
        // Cooperative siblings observed the cancellation; the call did not
        // wait out their 30s sleeps.
        assert!(started.elapsed() < secs(2), "took {:?}", started.elapsed());
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_sub_task_becomes_typed_failure() {
        let tasks = vec![
            db_call("ok", secs(3), "OK"),
            panicking_task("exploding", secs(1), "sub-task crashed"),
        ];

        let err = exec().run_all(&tasks).await.unwrap_err();
        assert_eq!(
            err,
            TaskError::Panicked {
                message: "sub-task crashed".to_string()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn executor_survives_a_crashing_cycle() {
        let executor = exec();

        let _ = executor
            .run_all(&[panicking_task("exploding", secs(0), "crash")])
            .await;

        // The executor is still usable for a clean follow-up cycle.
        let report = executor
            .run_all(&[db_call("after", secs(1), "fine")])
            .await
            .unwrap();
        assert_eq!(report.payload, "fine");
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_cycle_events() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let executor = FanOutExecutor::new(bus);

        executor
            .run_all(&[db_call("a", secs(1), "A")])
            .await
            .unwrap();

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert_eq!(kinds.first(), Some(&EventKind::FanOutStarting));
        assert_eq!(kinds.last(), Some(&EventKind::FanOutCompleted));
        assert!(kinds.contains(&EventKind::TaskCompleted));
    }
}
