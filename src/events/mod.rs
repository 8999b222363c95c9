//! Harness events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the fan-out executor, the deadline
//! supervisor, and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `FanOutExecutor`, `DeadlineSupervisor`, `SubscriberSet`
//!   workers (overflow/panic).
//! - **Consumer**: `Harness`'s bus listener, which fans out to the
//!   `SubscriberSet`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
