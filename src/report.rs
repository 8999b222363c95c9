//! Successful task outcome.
//!
//! [`TaskReport`] is what an executor or supervisor hands back when a task
//! (or a whole fan-out cycle) completes. Failures travel through the `Err`
//! arm as [`TaskError`](crate::TaskError), so a report never carries a
//! failure of its own.

use std::time::Duration;

/// Result of a completed task or fan-out cycle.
///
/// `elapsed` is always measured by the component that waited on the task
/// (start → end of the wait), never self-reported by the task itself. A hung
/// or slow task therefore cannot misreport its own runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskReport {
    /// Payload produced by the task; for a fan-out cycle, the ordered
    /// concatenation of all sub-task payloads.
    pub payload: String,
    /// Wall-clock running time as observed by the executor/supervisor.
    pub elapsed: Duration,
}

impl TaskReport {
    /// Creates a report from a payload and an observed running time.
    pub fn new(payload: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            payload: payload.into(),
            elapsed,
        }
    }
}
