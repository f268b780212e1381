//! Isolated evaluation worker.
//!
//! Spawned by the multiprocess strategy, one process per task: reads a
//! single JSON task line from stdin, evaluates it, writes one JSON reply
//! line to stdout, exits. Diagnostics go to stderr so they never mix with
//! the reply stream.

use std::sync::Arc;

use ss_engine::{run_worker, SyntheticTrainer};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let trainer = Arc::new(SyntheticTrainer::default());
    run_worker(trainer, std::io::stdin().lock(), std::io::stdout().lock())?;
    Ok(())
}
