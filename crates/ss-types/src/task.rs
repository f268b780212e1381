//! Task-level data model: candidate structures, evaluation tasks and
//! outcomes, and the append-only result row.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One hidden-layer topology to evaluate: an ordered, non-empty sequence of
/// positive layer widths in network order.
///
/// Zero widths never survive construction — a zero in a raw grid point means
/// "no layer at this position" and is stripped before the structure is
/// finalized. Ordering is lexicographic over the widths, which gives the
/// deterministic run order the generator relies on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateStructure(Vec<u32>);

impl CandidateStructure {
    /// Build from a raw grid point, stripping zero entries while preserving
    /// the relative order of the rest. Returns `None` for the all-zero point
    /// (an empty network is not a candidate).
    pub fn from_point(point: &[u32]) -> Option<Self> {
        let widths: Vec<u32> = point.iter().copied().filter(|&w| w != 0).collect();
        if widths.is_empty() {
            None
        } else {
            Some(Self(widths))
        }
    }

    pub fn widths(&self) -> &[u32] {
        &self.0
    }

    /// Number of hidden layers.
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl std::fmt::Display for CandidateStructure {
    /// Renders as `[16, 4]` — the literal form used in the artifact's
    /// `hidden_layer_sizes` column.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, w) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{w}")?;
        }
        write!(f, "]")
    }
}

/// One unit of work: evaluate a single candidate with the run's training
/// parameters. Immutable; serializable so it can cross the isolated-worker
/// process boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationTask {
    pub id: Uuid,
    pub structure: CandidateStructure,
    pub learning_rate: f64,
    pub epochs: u32,
}

impl EvaluationTask {
    pub fn new(structure: CandidateStructure, learning_rate: f64, epochs: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            structure,
            learning_rate,
            epochs,
        }
    }
}

/// The raw product of one training run, before summarization.
///
/// `costs` and `error_rates` are equal-length, training-progress-ordered
/// sequences whose length is determined by the training routine. Consumed
/// exactly once by the summarizer and not retained after logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub task: EvaluationTask,
    pub costs: Vec<f64>,
    pub error_rates: Vec<f64>,
    pub elapsed_seconds: f64,
}

/// One summarized, append-only line of the result artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub structure: CandidateStructure,
    pub learning_rate: f64,
    pub epochs: u32,
    /// Mean over the full cost sequence.
    pub avg_cost_all: f64,
    /// Mean over the last `min(W, len)` cost entries.
    pub avg_cost_tail: f64,
    /// Mean over the last `min(W, len)` error-rate entries.
    pub avg_error_tail: f64,
    pub elapsed_seconds: f64,
}

impl ResultRow {
    /// Render as one tab-delimited artifact line (no trailing newline).
    pub fn to_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.structure,
            self.learning_rate,
            self.epochs,
            self.avg_cost_all,
            self.avg_cost_tail,
            self.avg_error_tail,
            self.elapsed_seconds
        )
    }
}

/// Per-task lifecycle state.
///
/// Pending → Running → Completed | Failed. Terminal states are never left;
/// there is no automatic retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    Pending,
    Running,
    Completed,
    Failed,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}
