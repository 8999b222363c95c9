//! # Harness: wires the bus, subscribers, and both executors together.
//!
//! [`Harness`] owns the event [`Bus`], spawns the listener that fans bus
//! events out to a [`SubscriberSet`], and hands out the two components
//! configured against that bus:
//!
//! ```text
//! Harness::new(cfg, subscribers)
//!    ├── Bus (broadcast)
//!    ├── listener: Bus.subscribe() ─► SubscriberSet (per-subscriber queue
//!    │                                + worker; reports back to the bus)
//!    │
//!    ├── fan_out()    ─► FanOutExecutor    (publishes to the bus)
//!    └── supervisor() ─► DeadlineSupervisor (publishes to the bus)
//! ```
//!
//! One harness cycle is: one fan-out run, one deadline run. The harness does
//! not schedule repeated invocations. [`Harness::shutdown`] stops the
//! listener, drains events already published, and waits for subscriber
//! workers to finish.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    error::TaskError,
    events::Bus,
    exec::{deadline::DeadlineSupervisor, fanout::FanOutExecutor},
    report::TaskReport,
    subscribers::{Subscribe, SubscriberSet},
    tasks::TaskRef,
};

/// Entry surface of the crate: configured bus + subscribers + executors.
pub struct Harness {
    cfg: Config,
    bus: Bus,
    listener: JoinHandle<SubscriberSet>,
    stop: CancellationToken,
}

impl Harness {
    /// Creates a harness with the given config and subscribers, and spawns
    /// the bus listener.
    ///
    /// Must be called within a tokio runtime (the listener and subscriber
    /// workers are spawned tasks).
    pub fn new(cfg: Config, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity);
        let subs = SubscriberSet::new(subscribers, bus.clone());
        let stop = CancellationToken::new();
        let listener = Self::listener(&bus, subs, stop.clone());

        Self {
            cfg,
            bus,
            listener,
            stop,
        }
    }

    /// Subscribes to the bus and forwards events to the subscriber set until
    /// stopped; hands the set back so shutdown can await its workers.
    fn listener(bus: &Bus, set: SubscriberSet, stop: CancellationToken) -> JoinHandle<SubscriberSet> {
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    res = rx.recv() => match res {
                        Ok(ev) => set.emit_arc(Arc::new(ev)),
                        Err(RecvError::Lagged(_)) => continue,
                        Err(RecvError::Closed) => break,
                    },
                    _ = stop.cancelled() => break,
                }
            }
            // Forward whatever was already published before the stop signal.
            while let Ok(ev) = rx.try_recv() {
                set.emit_arc(Arc::new(ev));
            }
            set
        })
    }

    /// The harness configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// The event bus shared by both executors.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// A fan-out executor publishing to this harness's bus.
    pub fn fan_out(&self) -> FanOutExecutor {
        FanOutExecutor::new(self.bus.clone())
    }

    /// A deadline supervisor publishing to this harness's bus, with the
    /// configured timeout behavior.
    pub fn supervisor(&self) -> DeadlineSupervisor {
        DeadlineSupervisor::new(self.bus.clone(), self.cfg.cancel_on_deadline)
    }

    /// Convenience: one fan-out run over `tasks`.
    pub async fn run_all(&self, tasks: &[TaskRef]) -> Result<TaskReport, TaskError> {
        self.fan_out().run_all(tasks).await
    }

    /// Convenience: one deadline run with the configured
    /// [`Config::deadline`].
    pub async fn run_with_deadline(&self, task: TaskRef) -> Result<TaskReport, TaskError> {
        self.supervisor()
            .run_with_deadline(task, self.cfg.deadline)
            .await
    }

    /// Graceful teardown: stops the listener, forwards events already
    /// published, and waits for every subscriber to process its queue.
    pub async fn shutdown(self) {
        self.stop.cancel();
        if let Ok(set) = self.listener.await {
            set.shutdown().await;
        }
    }
}
