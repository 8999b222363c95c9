//! # Harness Demo
//!
//! One full harness cycle, mirroring the simulated workload end to end:
//! - a fan-out over three simulated database calls (8s / 4s / 9s) whose
//!   total cost is bounded by the slowest call;
//! - a deadline race over a flaky worker that randomly overruns its
//!   platform limit and gets killed instead of responding.
//!
//! Run with: `cargo run --example harness`

use std::sync::Arc;
use std::time::Duration;

use taskrace::{Config, Harness, LogWriter, Subscribe, TaskRef, sim};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::default();

    let subscribers: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];
    let harness = Harness::new(config.clone(), subscribers);

    // Fan-out: three independent "database calls", merged in input order.
    let calls = [
        sim::db_call("db-1", Duration::from_secs(8), "'db 1 result set'"),
        sim::db_call("db-2", Duration::from_secs(4), "'db 2 result set'"),
        sim::db_call("db-3", Duration::from_secs(9), "'db 3 result set'"),
    ];
    match harness.run_all(&calls).await {
        Ok(report) => {
            println!("fan-out success! result: {}", report.payload);
            println!("time to complete: {:?}", report.elapsed);
        }
        Err(err) => println!("fan-out failed: {}", err.as_message()),
    }

    // Deadline race: a worker that may overrun its simulated platform limit
    // and get killed; the harness reports Timeout instead of crashing.
    let flaky: TaskRef = Arc::new(sim::FlakyCall::from_config("flaky-call", &config));
    match harness.run_with_deadline(flaky).await {
        Ok(report) => {
            println!("deadline race success! result: {}", report.payload);
            println!("time to complete: {:?}", report.elapsed);
        }
        Err(err) => println!("deadline race failed [{}]: {}", err.as_label(), err.as_message()),
    }

    // Flush pending log lines before exiting.
    harness.shutdown().await;

    Ok(())
}
