//! # Global harness configuration.
//!
//! Provides [`Config`] centralized settings for one harness cycle.
//!
//! Config is used in two ways:
//! 1. **Harness creation**: `Harness::new(config, subscribers)`
//! 2. **Simulated workload defaults**: `FlakyCall::from_config(...)`
//!
//! ## Sentinel values
//! - `bus_capacity` is clamped to a minimum of 1 by the `Bus`.

use std::time::Duration;

/// Global configuration for the harness.
///
/// Defines:
/// - **Deadline race**: the supervisor's per-call deadline and what happens
///   to the task when it fires
/// - **Event system**: bus capacity for event delivery
/// - **Simulated workload**: sampler range and the simulated platform-kill
///   parameters used by the example tasks
///
/// ## Field semantics
/// - `deadline`: single fixed duration per supervisor call, not renewable
/// - `cancel_on_deadline`: `false` = abandon the task at the deadline (it
///   keeps running detached, the original behavior); `true` = cancel its
///   token before returning `Timeout`
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
/// - `max_task_secs`: upper bound (exclusive) of the duration sampler range
/// - `kill_after`: sampled durations above this simulate an over-limit task
/// - `kill_penalty`: how long an over-limit task sleeps before its simulated
///   hard kill (panic)
#[derive(Clone, Debug)]
pub struct Config {
    /// Deadline for a supervised task; whichever of {completion, deadline}
    /// happens first decides the call's outcome.
    pub deadline: Duration,

    /// Whether the supervisor cancels the task's token when the deadline
    /// fires. Either way, a late result or crash of the detached task is
    /// discarded — there is no second delivery.
    pub cancel_on_deadline: bool,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages
    /// will receive `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Exclusive upper bound of the duration sampler, in whole seconds.
    pub max_task_secs: u64,

    /// Simulated platform wall-clock limit for the example workload.
    pub kill_after: Duration,

    /// Sleep before the simulated hard kill fires for an over-limit task.
    pub kill_penalty: Duration,
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `deadline = 9s` (the supervisor returns before the 10s platform kill)
    /// - `cancel_on_deadline = false` (abandon, matching the modeled
    ///   external enforcement boundary)
    /// - `bus_capacity = 1024`
    /// - `max_task_secs = 20` (sampled runtimes in `[0, 20)` seconds)
    /// - `kill_after = 10s`
    /// - `kill_penalty = 10s`
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(9),
            cancel_on_deadline: false,
            bus_capacity: 1024,
            max_task_secs: 20,
            kill_after: Duration::from_secs(10),
            kill_penalty: Duration::from_secs(10),
        }
    }
}
