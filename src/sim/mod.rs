//! # Simulated workloads driving the harness.
//!
//! These are the example tasks: they stand in for time-bounded external
//! calls (the "database calls") and for a worker running under a platform
//! wall-clock limit. They exercise the executors; neither component depends
//! on them.
//!
//! - [`DbCall`]: sleeps a fixed duration, then returns its payload. The
//!   sleep is cancellation-aware, so fail-fast fan-out can cut it short.
//! - [`FlakyCall`]: samples its runtime from a [`DurationSampler`]. A sample
//!   over the kill threshold simulates a platform hard kill: the task sleeps
//!   the penalty period and then **panics** instead of returning. Otherwise
//!   it sleeps the sampled duration and returns its payload.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    error::TaskError,
    sampler::DurationSampler,
    tasks::{Task, TaskRef},
};

/// Sleeps `d`, or returns `Err(Canceled)` if the token fires first.
async fn sleep_or_cancel(d: Duration, ctx: &CancellationToken) -> Result<(), TaskError> {
    tokio::select! {
        _ = time::sleep(d) => Ok(()),
        _ = ctx.cancelled() => Err(TaskError::Canceled),
    }
}

/// Simulated database call: fixed duration, fixed payload.
pub struct DbCall {
    name: String,
    delay: Duration,
    payload: String,
}

impl DbCall {
    pub fn new(
        name: impl Into<String>,
        delay: Duration,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            delay,
            payload: payload.into(),
        }
    }
}

#[async_trait]
impl Task for DbCall {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: CancellationToken) -> Result<String, TaskError> {
        sleep_or_cancel(self.delay, &ctx).await?;
        Ok(self.payload.clone())
    }
}

/// Shorthand for an `Arc<DbCall>` task handle.
pub fn db_call(
    name: impl Into<String>,
    delay: Duration,
    payload: impl Into<String>,
) -> TaskRef {
    Arc::new(DbCall::new(name, delay, payload))
}

/// Simulated worker under a platform wall-clock limit.
///
/// Each run samples a runtime. Over-limit runs (`sample > kill_after`) sleep
/// the penalty period and then panic — the stand-in for the host environment
/// forcibly killing an overrunning unit of work. The supervisor's job is to
/// survive exactly this.
pub struct FlakyCall {
    name: String,
    sampler: DurationSampler,
    kill_after: Duration,
    kill_penalty: Duration,
    payload: String,
}

impl FlakyCall {
    pub fn new(
        name: impl Into<String>,
        sampler: DurationSampler,
        kill_after: Duration,
        kill_penalty: Duration,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            sampler,
            kill_after,
            kill_penalty,
            payload: payload.into(),
        }
    }

    /// Builds the workload from the harness [`Config`] (sampler range and
    /// kill parameters).
    pub fn from_config(name: impl Into<String>, cfg: &Config) -> Self {
        Self::new(
            name,
            DurationSampler::new(cfg.max_task_secs),
            cfg.kill_after,
            cfg.kill_penalty,
            "Database Result returned successfully",
        )
    }

    /// Runs one execution with an explicit runtime instead of a fresh
    /// sample. The kill decision and the panic live here.
    pub(crate) async fn run_with_runtime(
        &self,
        ctx: CancellationToken,
        runtime: Duration,
    ) -> Result<String, TaskError> {
        if runtime > self.kill_after {
            // The kill is external, not cooperative: the penalty sleep does
            // not observe the token, and there is no error return — the
            // worker just dies.
            time::sleep(self.kill_penalty).await;
            panic!(
                "ran {}s, killed at the {}s platform limit before responding",
                runtime.as_secs(),
                self.kill_after.as_secs()
            );
        }

        sleep_or_cancel(runtime, &ctx).await?;
        Ok(self.payload.clone())
    }
}

#[async_trait]
impl Task for FlakyCall {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: CancellationToken) -> Result<String, TaskError> {
        let runtime = self.sampler.sample();
        self.run_with_runtime(ctx, runtime).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Bus;
    use crate::exec::DeadlineSupervisor;
    use crate::tasks::TaskFn;
    use tokio::time::Instant;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn forced(flaky: Arc<FlakyCall>, runtime: Duration) -> TaskRef {
        TaskFn::arc("forced", move |ctx| {
            let flaky = Arc::clone(&flaky);
            async move { flaky.run_with_runtime(ctx, runtime).await }
        })
    }

    fn default_flaky() -> Arc<FlakyCall> {
        Arc::new(FlakyCall::from_config("flaky-call", &Config::default()))
    }

    #[tokio::test(start_paused = true)]
    async fn db_call_returns_payload_after_delay() {
        let started = Instant::now();
        let payload = db_call("db", secs(4), "rows")
            .run(CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(payload, "rows");
        assert!(started.elapsed() >= secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn db_call_acknowledges_cancellation() {
        let ctx = CancellationToken::new();
        ctx.cancel();
        let res = db_call("db", secs(30), "rows").run(ctx).await;
        assert_eq!(res, Err(TaskError::Canceled));
    }

    #[tokio::test(start_paused = true)]
    async fn under_limit_runtime_succeeds_with_sampled_duration() {
        let started = Instant::now();
        let payload = forced(default_flaky(), secs(6))
            .run(CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(payload, "Database Result returned successfully");
        assert!(started.elapsed() >= secs(6));
        assert!(started.elapsed() < secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn over_limit_runtime_is_killed_after_the_penalty() {
        // Sample 15 > limit 10: the supervisor sees Timeout at its 9s
        // deadline; the simulated kill (panic) fires later, at the 10s
        // penalty mark, and must not resurface.
        let sup = DeadlineSupervisor::new(Bus::new(64), false);

        let started = Instant::now();
        let err = sup
            .run_with_deadline(forced(default_flaky(), secs(15)), secs(9))
            .await
            .unwrap_err();

        assert_eq!(err, TaskError::Timeout { deadline: secs(9) });
        assert!(started.elapsed() < secs(10));

        // Ride past the abandoned worker's kill point.
        time::sleep(secs(15)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn over_limit_kill_is_typed_when_it_beats_the_deadline() {
        // Penalty 10s < deadline 30s: the kill resolves the race as a typed
        // Panicked, not as an unwinding fault.
        let err = DeadlineSupervisor::new(Bus::new(64), false)
            .run_with_deadline(forced(default_flaky(), secs(15)), secs(30))
            .await
            .unwrap_err();

        assert!(
            matches!(err, TaskError::Panicked { ref message } if message.contains("platform limit")),
            "got {err:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn sampled_runs_never_leak_a_panic() {
        // Whatever runtime gets sampled from [0, 20), the supervised outcome
        // is success or Timeout: a kill fires at >= 20s, after the 9s
        // deadline already abandoned the worker.
        let sup = DeadlineSupervisor::new(Bus::new(64), false);

        for _ in 0..5 {
            let task: TaskRef = default_flaky();
            match sup.run_with_deadline(task, secs(9)).await {
                Ok(report) => assert!(report.elapsed <= secs(9)),
                Err(TaskError::Timeout { deadline }) => assert_eq!(deadline, secs(9)),
                Err(other) => panic!("unexpected outcome: {other:?}"),
            }
            // Drain any abandoned worker past its kill point.
            time::sleep(secs(25)).await;
        }
    }
}
