//! Boundary to the external training routine.
//!
//! The routine itself is an external collaborator: given a topology, a
//! learning rate, and an epoch budget it returns per-epoch cost and
//! error-rate sequences. The adapter wraps exactly one call, times it,
//! and turns it into an [`EvaluationOutcome`].

use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use ss_types::{EvalError, EvaluationOutcome, EvaluationTask};

/// The external training routine.
///
/// Implementations must be callable concurrently from independent workers
/// without shared mutable state — each call is self-contained. Both
/// returned sequences are ordered by training progress and equal in
/// length; the length is determined by the routine.
pub trait Trainer: Send + Sync {
    fn train(
        &self,
        structure: &[u32],
        learning_rate: f64,
        epochs: u32,
    ) -> Result<(Vec<f64>, Vec<f64>), EvalError>;
}

/// Wraps one trainer call per task and measures wall-clock time around it.
///
/// A failure from the routine aborts that single task only, never the run.
#[derive(Clone)]
pub struct TrainingAdapter {
    trainer: Arc<dyn Trainer>,
}

impl TrainingAdapter {
    pub fn new(trainer: Arc<dyn Trainer>) -> Self {
        Self { trainer }
    }

    pub fn evaluate(&self, task: &EvaluationTask) -> Result<EvaluationOutcome, EvalError> {
        debug!(structure = %task.structure, "evaluating candidate");

        let started = Instant::now();
        let (costs, error_rates) =
            self.trainer
                .train(task.structure.widths(), task.learning_rate, task.epochs)?;
        let elapsed_seconds = started.elapsed().as_secs_f64();

        Ok(EvaluationOutcome {
            task: task.clone(),
            costs,
            error_rates,
            elapsed_seconds,
        })
    }
}
