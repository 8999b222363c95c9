//! # taskrace
//!
//! **Taskrace** is a bounded-time task execution harness for Rust.
//!
//! It provides two independent primitives built on a shared, cancelable
//! [`Task`] abstraction:
//!
//! - [`FanOutExecutor`] — runs K independent sub-tasks concurrently, waits
//!   for all of them, and merges their payloads in input order; the whole
//!   cycle costs as much as the **slowest** sub-task, not the sum.
//! - [`DeadlineSupervisor`] — runs one task on an isolated execution context
//!   and races it against a hard deadline; whichever resolves first decides
//!   the outcome. A panicking task becomes a typed
//!   [`TaskError::Panicked`] instead of taking the supervisor down, and a
//!   task that outlives its deadline is abandoned, its late result or crash
//!   discarded.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │     Task     │   │     Task     │   │     Task     │
//!     │  (sub-task)  │   │  (sub-task)  │   │ (supervised) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌─────────────────────────────────────┐ ┌──────────────────────────┐
//! │  FanOutExecutor                     │ │  DeadlineSupervisor      │
//! │  - one worker per sub-task          │ │  - one isolated worker   │
//! │  - per-slot payload (input order)   │ │  - select!{join, timer}  │
//! │  - fail-fast + sibling cancellation │ │  - abandon on timeout    │
//! └──────────────────┬──────────────────┘ └──────────┬───────────────┘
//!                    │ publish Events                │ publish Events
//!                    ▼                               ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                          Harness listener ──► SubscriberSet
//!                                               ┌────┼────┐
//!                                               ▼    ▼    ▼
//!                                             sub1  sub2  subN
//! ```
//!
//! ## Failure model
//! Every call returns exactly one typed outcome:
//!
//! | Outcome                  | Meaning                                         |
//! |--------------------------|-------------------------------------------------|
//! | `Ok(TaskReport)`         | payload + elapsed (measured by the harness)     |
//! | `Err(Timeout)`           | deadline fired first; task abandoned            |
//! | `Err(Panicked)`          | task crashed; converted at the panic boundary   |
//! | `Err(Fail)`              | task completed with a domain failure            |
//!
//! Panics are contained at the worker root (`catch_unwind`), so an abnormal
//! termination — even of an already-abandoned task — never unwinds into the
//! caller or kills sibling sub-tasks.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use taskrace::{Config, Harness, sim};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let harness = Harness::new(Config::default(), Vec::new());
//!
//!     let report = harness
//!         .run_all(&[
//!             sim::db_call("db-1", Duration::from_millis(80), "'db 1 result set'"),
//!             sim::db_call("db-2", Duration::from_millis(40), "'db 2 result set'"),
//!             sim::db_call("db-3", Duration::from_millis(90), "'db 3 result set'"),
//!         ])
//!         .await?;
//!
//!     // Input-order merge, slowest-bounded elapsed.
//!     assert!(report.payload.starts_with("'db 1 result set'"));
//!     assert!(report.elapsed < Duration::from_millis(200));
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod events;
mod exec;
mod report;
mod sampler;
mod subscribers;
mod tasks;

pub mod sim;

// ---- Public re-exports ----

pub use config::Config;
pub use error::TaskError;
pub use events::{Bus, Event, EventKind};
pub use exec::{DeadlineSupervisor, FanOutExecutor, Harness};
pub use report::TaskReport;
pub use sampler::DurationSampler;
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use tasks::{Task, TaskFn, TaskRef};
