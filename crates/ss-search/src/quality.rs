//! Quality summarization.
//!
//! Pure reduction of one evaluation's raw cost/error sequences to the
//! scalar summaries recorded in the result artifact.

use ss_types::{EvalError, EvaluationOutcome, ResultRow};

/// Arithmetic mean of a sequence. Caller guarantees non-empty.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean over the last `min(window, len)` elements.
///
/// A sequence shorter than the window degrades gracefully to the full-
/// sequence mean rather than failing.
pub fn tail_mean(values: &[f64], window: usize) -> f64 {
    let start = values.len().saturating_sub(window);
    mean(&values[start..])
}

/// Reduce an evaluation outcome to its result row.
///
/// A zero-length cost or error sequence is a contract violation by the
/// training adapter and surfaces as [`EvalError::EmptySequence`], isolated
/// to the task like any other evaluation failure.
pub fn summarize(outcome: &EvaluationOutcome, window: usize) -> Result<ResultRow, EvalError> {
    if outcome.costs.is_empty() || outcome.error_rates.is_empty() {
        return Err(EvalError::EmptySequence {
            structure: outcome.task.structure.to_string(),
        });
    }

    Ok(ResultRow {
        structure: outcome.task.structure.clone(),
        learning_rate: outcome.task.learning_rate,
        epochs: outcome.task.epochs,
        avg_cost_all: mean(&outcome.costs),
        avg_cost_tail: tail_mean(&outcome.costs, window),
        avg_error_tail: tail_mean(&outcome.error_rates, window),
        elapsed_seconds: outcome.elapsed_seconds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ss_types::{CandidateStructure, EvaluationTask};

    fn outcome(costs: Vec<f64>, error_rates: Vec<f64>) -> EvaluationOutcome {
        EvaluationOutcome {
            task: EvaluationTask::new(
                CandidateStructure::from_point(&[16, 4]).unwrap(),
                1e-3,
                200,
            ),
            costs,
            error_rates,
            elapsed_seconds: 2.5,
        }
    }

    #[test]
    fn reference_window_arithmetic() {
        let row = summarize(&outcome(vec![1.0, 2.0, 3.0, 4.0, 5.0], vec![0.5; 5]), 3).unwrap();
        assert_eq!(row.avg_cost_all, 3.0);
        assert_eq!(row.avg_cost_tail, 4.0); // mean([3,4,5])
        assert_eq!(row.avg_error_tail, 0.5);
        assert_eq!(row.elapsed_seconds, 2.5);
    }

    #[test]
    fn short_sequence_degrades_to_full_mean() {
        let row = summarize(&outcome(vec![2.0, 4.0], vec![0.2, 0.4]), 200).unwrap();
        assert_eq!(row.avg_cost_tail, row.avg_cost_all);
        assert_eq!(row.avg_cost_all, 3.0);
        assert!((row.avg_error_tail - 0.3).abs() < 1e-12);
    }

    #[test]
    fn empty_sequence_is_a_contract_violation() {
        match summarize(&outcome(vec![], vec![]), 200) {
            Err(EvalError::EmptySequence { structure }) => {
                assert_eq!(structure, "[16, 4]");
            }
            other => panic!("expected EmptySequence, got {other:?}"),
        }
    }

    #[test]
    fn row_carries_task_parameters() {
        let row = summarize(&outcome(vec![1.0], vec![0.1]), 200).unwrap();
        assert_eq!(row.structure.to_string(), "[16, 4]");
        assert_eq!(row.learning_rate, 1e-3);
        assert_eq!(row.epochs, 200);
    }
}
