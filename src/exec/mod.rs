//! Execution core: fan-out, deadline race, and the harness facade.
//!
//! Internal modules:
//! - [`runner`]: executes one task behind a panic boundary, publishing
//!   lifecycle events;
//! - [`fanout`]: concurrent fan-out/fan-in with input-order merge;
//! - [`deadline`]: races one task against a hard deadline;
//! - [`harness`]: wires bus, subscribers, and both executors.

mod deadline;
mod fanout;
mod harness;
mod runner;

pub use deadline::DeadlineSupervisor;
pub use fanout::FanOutExecutor;
pub use harness::Harness;
