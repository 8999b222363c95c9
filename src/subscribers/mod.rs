//! # Event subscribers for the harness.
//!
//! This module provides the [`Subscribe`] trait and built-in implementations
//! for handling events broadcast through the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   FanOutExecutor ──┐
//!                    ├─ publish(Event) ──► Bus ──► Harness listener ──► SubscriberSet
//!   DeadlineSupervisor ┘                                                    │
//!                                                             ┌─────────────┼────────────┐
//!                                                             ▼             ▼            ▼
//!                                                         [queue S1]   [queue S2]   [queue SN]
//!                                                             │             │            │
//!                                                         worker S1     worker S2    worker SN
//!                                                             │             │            │
//!                                                      sub.on_event()  sub.on_event() ...
//! ```

mod log;
mod set;
mod subscribe;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
