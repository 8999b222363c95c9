//! # Runtime events emitted by the executors and the supervisor.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Task lifecycle**: a single task's execution flow (starting, completed,
//!   failed, panicked)
//! - **Deadline race**: supervisor outcomes (deadline hit, task abandoned)
//! - **Fan-out cycle**: whole-cycle markers (starting, completed, failed)
//!
//! The [`Event`] struct carries additional metadata such as timestamps, task
//! name, reasons, observed elapsed time, and the racing deadline.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use taskrace::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_task("db-call-1")
//!     .with_reason("connection refused")
//!     .with_elapsed(Duration::from_secs(4));
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.task.as_deref(), Some("db-call-1"));
//! assert_eq!(ev.reason.as_deref(), Some("connection refused"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of harness events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Task lifecycle events ===
    /// Task execution is starting.
    ///
    /// Sets: `task`, `at`, `seq`.
    TaskStarting,

    /// Task completed successfully.
    ///
    /// Sets: `task`, `elapsed_ms` (observed running time), `at`, `seq`.
    TaskCompleted,

    /// Task completed with a domain failure (or acknowledged cancellation).
    ///
    /// Sets: `task`, `reason`, `at`, `seq`.
    TaskFailed,

    /// Task terminated abnormally; the panic was converted at the isolation
    /// boundary.
    ///
    /// Sets: `task`, `reason` (panic message), `at`, `seq`.
    TaskPanicked,

    // === Deadline race events ===
    /// The deadline fired before the task completed.
    ///
    /// Sets: `task`, `deadline_ms`, `at`, `seq`.
    DeadlineHit,

    /// The task was left running detached after its deadline fired.
    ///
    /// Sets: `task`, `deadline_ms`, `at`, `seq`.
    TaskAbandoned,

    // === Fan-out cycle events ===
    /// A fan-out cycle is starting.
    ///
    /// Sets: `width` (number of sub-tasks), `at`, `seq`.
    FanOutStarting,

    /// All sub-tasks of a fan-out cycle finished and the merge succeeded.
    ///
    /// Sets: `width`, `elapsed_ms`, `at`, `seq`.
    FanOutCompleted,

    /// A fan-out cycle ended with at least one sub-task failure.
    ///
    /// Sets: `width`, `reason` (first failure), `elapsed_ms`, `at`, `seq`.
    FanOutFailed,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `task` (subscriber name), `reason`, `at`, `seq`.
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `task` (subscriber name), `reason`, `at`, `seq`.
    SubscriberOverflow,
}

/// Harness event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the task (or subscriber), if applicable.
    pub task: Option<Arc<str>>,
    /// Human-readable reason (errors, panic messages, overflow details).
    pub reason: Option<Arc<str>>,
    /// Observed running time in milliseconds (compact).
    pub elapsed_ms: Option<u64>,
    /// The racing deadline in milliseconds (compact).
    pub deadline_ms: Option<u64>,
    /// Number of sub-tasks in a fan-out cycle.
    pub width: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            reason: None,
            elapsed_ms: None,
            deadline_ms: None,
            width: None,
        }
    }

    /// Attaches a task (or subscriber) name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an observed running time (stored as milliseconds).
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        self.elapsed_ms = Some(d.as_millis().min(u128::from(u64::MAX)) as u64);
        self
    }

    /// Attaches the racing deadline (stored as milliseconds).
    #[inline]
    pub fn with_deadline(mut self, d: Duration) -> Self {
        self.deadline_ms = Some(d.as_millis().min(u128::from(u64::MAX)) as u64);
        self
    }

    /// Attaches the fan-out width.
    #[inline]
    pub fn with_width(mut self, n: usize) -> Self {
        self.width = Some(n.min(u32::MAX as usize) as u32);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_monotonic() {
        let a = Event::new(EventKind::TaskStarting);
        let b = Event::new(EventKind::TaskStarting);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn builders_set_metadata() {
        let ev = Event::new(EventKind::DeadlineHit)
            .with_task("flaky-call")
            .with_deadline(Duration::from_secs(9))
            .with_reason("deadline exceeded");

        assert_eq!(ev.task.as_deref(), Some("flaky-call"));
        assert_eq!(ev.deadline_ms, Some(9_000));
        assert_eq!(ev.reason.as_deref(), Some("deadline exceeded"));
        assert_eq!(ev.elapsed_ms, None);
    }

    #[test]
    fn elapsed_is_stored_in_millis() {
        let ev = Event::new(EventKind::TaskCompleted).with_elapsed(Duration::from_millis(6_250));
        assert_eq!(ev.elapsed_ms, Some(6_250));
    }

    #[test]
    fn width_is_clamped() {
        let ev = Event::new(EventKind::FanOutStarting).with_width(3);
        assert_eq!(ev.width, Some(3));
    }
}
