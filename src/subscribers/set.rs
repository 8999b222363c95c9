//! # SubscriberSet: non-blocking fan-out over multiple subscribers
//!
//! [`SubscriberSet`] distributes each [`Event`](crate::events::Event) to
//! multiple subscribers **without awaiting** their processing. Delivery
//! trouble is reported back through the bus itself:
//!
//! - a subscriber that panics inside `on_event` produces a
//!   [`EventKind::SubscriberPanicked`](crate::events::EventKind) event and
//!   its worker keeps running;
//! - a full or closed per-subscriber queue drops the event for that
//!   subscriber and produces a
//!   [`EventKind::SubscriberOverflow`](crate::events::EventKind) event.
//!
//! ## What it guarantees
//! - `emit(&Event)` returns immediately.
//! - Per-subscriber FIFO (queue order).
//! - Panics inside subscribers are caught and reported (isolation).
//!
//! ## What it does **not** guarantee
//! - No global ordering across different subscribers.
//! - No retries on per-subscriber queue overflow (events are dropped for that
//!   subscriber).

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::error::panic_message;
use crate::events::{Bus, Event, EventKind};

use super::Subscribe;

/// Per-subscriber channel with metadata
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Composite fan-out with per-subscriber bounded queues and worker tasks.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker per subscriber.
    ///
    /// `bus` receives the set's own delivery reports
    /// (`SubscriberPanicked` / `SubscriberOverflow`).
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);
            let s = Arc::clone(&sub);
            let worker_bus = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = s.on_event(ev.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        worker_bus
                            .publish(Event::subscriber_panicked(s.name(), panic_message(panic_err)));
                    }
                }
            });

            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }

        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Fan-out one event to all subscribers (non-blocking).
    pub fn emit(&self, event: &Event) {
        self.emit_arc(Arc::new(event.clone()));
    }

    /// Fan-out one already-shared event to all subscribers (non-blocking).
    ///
    /// If a subscriber's queue is **full** or **closed**, the event is
    /// dropped for it and a `SubscriberOverflow` event naming the subscriber
    /// is published — unless the event being delivered is itself an overflow
    /// report, so a wedged subscriber cannot feed back an endless stream of
    /// reports about its own reports.
    pub fn emit_arc(&self, event: Arc<Event>) {
        let is_overflow_report = matches!(event.kind, EventKind::SubscriberOverflow);
        for channel in &self.channels {
            let reason = match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if !is_overflow_report {
                self.bus
                    .publish(Event::subscriber_overflow(channel.name, reason));
            }
        }
    }

    /// Graceful shutdown: close all queues and await worker completion.
    ///
    /// Workers drain whatever is already queued before exiting, so every
    /// event accepted by `emit` has been processed once this returns.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recorder {
        seen: Mutex<Vec<EventKind>>,
        notify: tokio::sync::mpsc::UnboundedSender<()>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, event: &Event) {
            self.seen.lock().unwrap().push(event.kind);
            let _ = self.notify.send(());
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    struct Exploder {
        notify: tokio::sync::mpsc::UnboundedSender<()>,
    }

    #[async_trait]
    impl Subscribe for Exploder {
        async fn on_event(&self, _event: &Event) {
            let _ = self.notify.send(());
            panic!("subscriber exploded");
        }

        fn name(&self) -> &'static str {
            "exploder"
        }
    }

    /// Parks forever on the first event, with room for exactly one more in
    /// its queue.
    struct Wedged;

    #[async_trait]
    impl Subscribe for Wedged {
        async fn on_event(&self, _event: &Event) {
            std::future::pending::<()>().await;
        }

        fn name(&self) -> &'static str {
            "wedged"
        }

        fn queue_capacity(&self) -> usize {
            1
        }
    }

    #[tokio::test]
    async fn events_are_delivered_in_order() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
            notify: tx,
        });
        let set = SubscriberSet::new(vec![recorder.clone() as Arc<dyn Subscribe>], Bus::new(8));

        set.emit(&Event::new(EventKind::TaskStarting));
        set.emit(&Event::new(EventKind::TaskCompleted));

        rx.recv().await.unwrap();
        rx.recv().await.unwrap();

        let seen = recorder.seen.lock().unwrap().clone();
        assert_eq!(seen, vec![EventKind::TaskStarting, EventKind::TaskCompleted]);
    }

    #[tokio::test]
    async fn panicking_subscriber_is_reported_and_survives() {
        let bus = Bus::new(8);
        let mut bus_rx = bus.subscribe();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let set = SubscriberSet::new(
            vec![Arc::new(Exploder { notify: tx }) as Arc<dyn Subscribe>],
            bus,
        );

        set.emit(&Event::new(EventKind::TaskStarting));
        rx.recv().await.unwrap();

        // The panic surfaces as a bus event naming the subscriber.
        let report = bus_rx.recv().await.unwrap();
        assert_eq!(report.kind, EventKind::SubscriberPanicked);
        assert_eq!(report.task.as_deref(), Some("exploder"));
        assert_eq!(report.reason.as_deref(), Some("subscriber exploded"));

        // Worker survived the panic; a second event still gets through.
        set.emit(&Event::new(EventKind::TaskCompleted));
        rx.recv().await.unwrap();
    }

    #[tokio::test]
    async fn overflow_drops_only_for_the_wedged_subscriber() {
        let bus = Bus::new(8);
        let mut bus_rx = bus.subscribe();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
            notify: tx,
        });
        let set = SubscriberSet::new(
            vec![
                Arc::new(Wedged) as Arc<dyn Subscribe>,
                recorder.clone() as Arc<dyn Subscribe>,
            ],
            bus,
        );

        set.emit(&Event::new(EventKind::TaskStarting));
        // Let the wedged worker pull the first event and park in on_event.
        tokio::task::yield_now().await;
        set.emit(&Event::new(EventKind::TaskCompleted));
        set.emit(&Event::new(EventKind::FanOutCompleted));

        // The healthy sibling still received every event, in order.
        rx.recv().await.unwrap();
        rx.recv().await.unwrap();
        rx.recv().await.unwrap();
        let seen = recorder.seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                EventKind::TaskStarting,
                EventKind::TaskCompleted,
                EventKind::FanOutCompleted,
            ]
        );

        // At least one event was dropped for the wedged subscriber, and the
        // drop was reported on the bus with its name.
        let mut overflows = Vec::new();
        while let Ok(ev) = bus_rx.try_recv() {
            if ev.kind == EventKind::SubscriberOverflow {
                overflows.push(ev);
            }
        }
        assert!(!overflows.is_empty());
        for ev in &overflows {
            assert_eq!(ev.task.as_deref(), Some("wedged"));
            assert_eq!(ev.reason.as_deref(), Some("full"));
        }
    }

    #[tokio::test]
    async fn shutdown_waits_for_queued_events() {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
            notify: tx,
        });
        let set = SubscriberSet::new(vec![recorder.clone() as Arc<dyn Subscribe>], Bus::new(8));

        set.emit(&Event::new(EventKind::TaskStarting));
        set.emit(&Event::new(EventKind::TaskCompleted));
        set.shutdown().await;

        // Both events were processed before shutdown returned.
        let seen = recorder.seen.lock().unwrap().clone();
        assert_eq!(seen, vec![EventKind::TaskStarting, EventKind::TaskCompleted]);
    }
}
