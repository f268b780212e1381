use std::sync::Arc;

use ss_engine::{ScanRunner, SyntheticTrainer};
use ss_types::{ExecStrategy, LayerRange, ScanConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("SlimScan Basic Scan Example");

    // Sweep two hidden-layer positions; the second layer may be absent.
    let config = ScanConfig::new(
        "basic_scan",
        vec![LayerRange::new(1, 8), LayerRange::new(0, 4)],
        "scan_results.tsv",
    )
    .with_learning_rate(1e-3)
    .with_epochs(200)
    .with_window(10)
    .with_strategy(ExecStrategy::Threaded { max_threads: 3 })
    .with_init_artifact(true);

    let runner = ScanRunner::new(config, Arc::new(SyntheticTrainer::default()));
    let report = runner.run()?;

    println!(
        "scan finished: {} completed, {} failed, {:.2}s",
        report.completed, report.failed, report.elapsed_seconds
    );
    for failure in &report.failures {
        println!("  failed candidate {}: {}", failure.structure, failure.error);
    }

    Ok(())
}
