//! Isolated-worker strategy tests, driving the real `ss-worker` binary.

use std::path::Path;
use std::sync::Arc;

use ss_engine::{ScanRunner, SyntheticTrainer};
use ss_types::{ExecStrategy, LayerRange, ScanConfig, ScanError};

const WORKER: &str = env!("CARGO_BIN_EXE_ss-worker");

fn config(artifact: &Path, ranges: &[(u32, u32)]) -> ScanConfig {
    let ranges = ranges
        .iter()
        .map(|&(lo, hi)| LayerRange::new(lo, hi))
        .collect();
    ScanConfig::new("multiprocess_test", ranges, artifact)
        .with_epochs(100)
        .with_window(5)
        .with_init_artifact(true)
}

fn row_keys(artifact: &Path) -> Vec<String> {
    let content = std::fs::read_to_string(artifact).unwrap();
    let mut keys: Vec<String> = content
        .lines()
        .skip(1)
        .map(|line| line.rsplit_once('\t').unwrap().0.to_string())
        .collect();
    keys.sort();
    keys
}

#[test]
fn multiprocess_matches_serial_with_the_same_trainer() {
    let dir = tempfile::tempdir().unwrap();
    let ranges = [(1, 2), (0, 1)];

    // The worker binary evaluates with SyntheticTrainer::default(), so a
    // serial run over the same trainer must produce identical summaries.
    let serial = dir.path().join("serial.tsv");
    let runner = ScanRunner::new(
        config(&serial, &ranges).with_strategy(ExecStrategy::Serial),
        Arc::new(SyntheticTrainer::default()),
    );
    let serial_report = runner.run().unwrap();

    let isolated = dir.path().join("isolated.tsv");
    let runner = ScanRunner::new(
        config(&isolated, &ranges).with_strategy(ExecStrategy::Multiprocess { max_processes: 1 }),
        Arc::new(SyntheticTrainer::default()),
    )
    .with_worker_program(WORKER);
    let isolated_report = runner.run().unwrap();

    assert_eq!(serial_report.completed, isolated_report.completed);
    assert_eq!(isolated_report.failed, 0);
    assert_eq!(row_keys(&isolated), row_keys(&serial));
}

#[test]
fn multiprocess_respects_a_wider_budget() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("wide.tsv");
    let runner = ScanRunner::new(
        config(&artifact, &[(1, 3), (0, 1)])
            .with_strategy(ExecStrategy::Multiprocess { max_processes: 3 }),
        Arc::new(SyntheticTrainer::default()),
    )
    .with_worker_program(WORKER);

    let report = runner.run().unwrap();

    assert_eq!(report.completed + report.failed, report.total);
    assert_eq!(report.failed, 0);
    assert_eq!(row_keys(&artifact).len(), report.total);
}

#[test]
fn multiprocess_without_a_worker_program_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("missing.tsv");
    let runner = ScanRunner::new(
        config(&artifact, &[(1, 2)]).with_strategy(ExecStrategy::Multiprocess { max_processes: 2 }),
        Arc::new(SyntheticTrainer::default()),
    );

    match runner.run() {
        Err(ScanError::Internal(message)) => assert!(message.contains("worker program")),
        other => panic!("expected Internal error, got {other:?}"),
    }
}

#[test]
fn unspawnable_worker_isolates_failures_per_task() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("broken.tsv");
    let runner = ScanRunner::new(
        config(&artifact, &[(1, 3)]).with_strategy(ExecStrategy::Multiprocess { max_processes: 2 }),
        Arc::new(SyntheticTrainer::default()),
    )
    .with_worker_program("/nonexistent/ss-worker");

    let report = runner.run().unwrap();

    // Every spawn fails, every task is recorded as failed, nothing hangs.
    assert_eq!(report.total, 3);
    assert_eq!(report.failed, 3);
    assert_eq!(report.completed, 0);
    assert!(report.is_complete());
}
