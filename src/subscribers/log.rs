//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [starting] task=db-call-1
//! [completed] task=db-call-1 elapsed=8000ms
//! [failed] task=db-call-2 err="connection refused"
//! [panicked] task=flaky-call err="took 15s, limit is 10s"
//! [deadline-hit] task=flaky-call deadline=9000ms
//! [abandoned] task=flaky-call deadline=9000ms
//! [fan-out-starting] width=3
//! [fan-out-completed] width=3 elapsed=9000ms
//! ```

use async_trait::async_trait;

use super::Subscribe;
use crate::events::{Event, EventKind};

/// Simple stdout logging subscriber.
///
/// Prints human-readable event descriptions to stdout for debugging and
/// demonstration purposes. Not intended for production use - implement a
/// custom [`Subscribe`] for structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::TaskStarting => {
                if let Some(task) = &e.task {
                    println!("[starting] task={task}");
                }
            }
            EventKind::TaskCompleted => {
                println!(
                    "[completed] task={:?} elapsed={:?}ms",
                    e.task, e.elapsed_ms
                );
            }
            EventKind::TaskFailed => {
                println!("[failed] task={:?} err={:?}", e.task, e.reason);
            }
            EventKind::TaskPanicked => {
                println!("[panicked] task={:?} err={:?}", e.task, e.reason);
            }
            EventKind::DeadlineHit => {
                println!(
                    "[deadline-hit] task={:?} deadline={:?}ms",
                    e.task, e.deadline_ms
                );
            }
            EventKind::TaskAbandoned => {
                println!(
                    "[abandoned] task={:?} deadline={:?}ms",
                    e.task, e.deadline_ms
                );
            }
            EventKind::FanOutStarting => {
                println!("[fan-out-starting] width={:?}", e.width);
            }
            EventKind::FanOutCompleted => {
                println!(
                    "[fan-out-completed] width={:?} elapsed={:?}ms",
                    e.width, e.elapsed_ms
                );
            }
            EventKind::FanOutFailed => {
                println!(
                    "[fan-out-failed] width={:?} err={:?} elapsed={:?}ms",
                    e.width, e.reason, e.elapsed_ms
                );
            }
            EventKind::SubscriberPanicked => {
                println!("[subscriber-panicked] sub={:?} info={:?}", e.task, e.reason);
            }
            EventKind::SubscriberOverflow => {
                println!("[subscriber-overflow] sub={:?} reason={:?}", e.task, e.reason);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
