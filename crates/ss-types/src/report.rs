//! Aggregate outcome of a scan run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ScanId;
use crate::task::CandidateStructure;

/// A per-task failure, with enough context to re-run the candidate by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskFailure {
    pub structure: CandidateStructure,
    pub learning_rate: f64,
    pub epochs: u32,
    pub error: String,
}

/// Summary of a finished (or aborted) scan run.
///
/// The run as a whole is considered successful when every generated task
/// reached a terminal state, even if some of them failed — per-candidate
/// failures are recorded here, not turned into a run-level error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub run_id: ScanId,
    /// Number of candidates generated and dispatched.
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub failures: Vec<TaskFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub elapsed_seconds: f64,
}

impl ScanReport {
    pub fn started(run_id: ScanId, total: usize) -> Self {
        Self {
            run_id,
            total,
            completed: 0,
            failed: 0,
            failures: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
            elapsed_seconds: 0.0,
        }
    }

    pub fn record_completed(&mut self) {
        self.completed += 1;
    }

    pub fn record_failure(&mut self, failure: TaskFailure) {
        self.failed += 1;
        self.failures.push(failure);
    }

    pub fn mark_finished(&mut self, elapsed_seconds: f64) {
        self.finished_at = Some(Utc::now());
        self.elapsed_seconds = elapsed_seconds;
    }

    /// Every dispatched task reached a terminal state.
    pub fn is_complete(&self) -> bool {
        self.completed + self.failed == self.total
    }
}
