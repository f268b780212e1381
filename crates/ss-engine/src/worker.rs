//! Isolated-worker wire protocol.
//!
//! The multiprocess strategy runs each evaluation in a separate address
//! space. The coordinator writes one JSON-serialized [`EvaluationTask`]
//! line to the child's stdin and reads back one [`WorkerReply`] line from
//! its stdout; the child exits after replying. Tasks and outcomes are the
//! only data that cross the boundary.

use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Command, Stdio};
use tracing::debug;

use ss_types::{EvalError, EvaluationOutcome, EvaluationTask};

use crate::adapter::{Trainer, TrainingAdapter};

/// The child's one-line answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerReply {
    Ok(EvaluationOutcome),
    Err(String),
}

/// Child side of the protocol: read one task, evaluate it with the given
/// trainer, reply, return. Generic over the streams so it is testable
/// without spawning a process.
pub fn run_worker<R: Read, W: Write>(
    trainer: std::sync::Arc<dyn Trainer>,
    reader: R,
    mut writer: W,
) -> std::io::Result<()> {
    let mut line = String::new();
    BufReader::new(reader).read_line(&mut line)?;

    let reply = match serde_json::from_str::<EvaluationTask>(line.trim_end()) {
        Ok(task) => {
            debug!(structure = %task.structure, "worker received task");
            match TrainingAdapter::new(trainer).evaluate(&task) {
                Ok(outcome) => WorkerReply::Ok(outcome),
                Err(err) => WorkerReply::Err(err.to_string()),
            }
        }
        Err(err) => WorkerReply::Err(format!("malformed task: {err}")),
    };

    let encoded = serde_json::to_string(&reply)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    writeln!(writer, "{encoded}")?;
    writer.flush()
}

/// Parent side: spawn one child for the task, marshal it across, and wait
/// for the reply. Any marshalling or process fault surfaces as
/// [`EvalError::WorkerProtocol`], isolated to this task.
pub fn evaluate_in_subprocess(
    program: &std::path::Path,
    task: &EvaluationTask,
) -> Result<EvaluationOutcome, EvalError> {
    let mut child = Command::new(program)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|err| EvalError::WorkerProtocol(format!("failed to spawn worker: {err}")))?;

    let task_json = serde_json::to_string(task)
        .map_err(|err| EvalError::WorkerProtocol(format!("failed to encode task: {err}")))?;

    {
        // Scope closes the pipe so the child sees EOF after the task line.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EvalError::WorkerProtocol("worker stdin unavailable".into()))?;
        writeln!(stdin, "{task_json}")
            .map_err(|err| EvalError::WorkerProtocol(format!("failed to send task: {err}")))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|err| EvalError::WorkerProtocol(format!("failed to join worker: {err}")))?;
    if !output.status.success() {
        return Err(EvalError::WorkerProtocol(format!(
            "worker exited with {}",
            output.status
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout
        .lines()
        .next()
        .ok_or_else(|| EvalError::WorkerProtocol("worker produced no reply".into()))?;

    match serde_json::from_str::<WorkerReply>(line) {
        Ok(WorkerReply::Ok(outcome)) => Ok(outcome),
        Ok(WorkerReply::Err(message)) => Err(EvalError::TrainingFailed {
            structure: task.structure.to_string(),
            message,
        }),
        Err(err) => Err(EvalError::WorkerProtocol(format!(
            "malformed worker reply: {err}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ss_types::CandidateStructure;
    use std::io::Cursor;
    use std::sync::Arc;

    struct EchoTrainer;

    impl Trainer for EchoTrainer {
        fn train(
            &self,
            structure: &[u32],
            _learning_rate: f64,
            _epochs: u32,
        ) -> Result<(Vec<f64>, Vec<f64>), EvalError> {
            let first = f64::from(structure[0]);
            Ok((vec![first, first / 2.0], vec![0.5, 0.25]))
        }
    }

    struct FailingTrainer;

    impl Trainer for FailingTrainer {
        fn train(
            &self,
            structure: &[u32],
            _learning_rate: f64,
            _epochs: u32,
        ) -> Result<(Vec<f64>, Vec<f64>), EvalError> {
            Err(EvalError::TrainingFailed {
                structure: format!("{structure:?}"),
                message: "resource exhausted".into(),
            })
        }
    }

    fn task() -> EvaluationTask {
        EvaluationTask::new(CandidateStructure::from_point(&[6, 2]).unwrap(), 1e-3, 50)
    }

    #[test]
    fn round_trip_through_in_memory_streams() {
        let task = task();
        let input = format!("{}\n", serde_json::to_string(&task).unwrap());
        let mut output = Vec::new();

        run_worker(Arc::new(EchoTrainer), Cursor::new(input), &mut output).unwrap();

        let reply: WorkerReply = serde_json::from_slice(&output).unwrap();
        match reply {
            WorkerReply::Ok(outcome) => {
                assert_eq!(outcome.task.id, task.id);
                assert_eq!(outcome.costs, vec![6.0, 3.0]);
            }
            other => panic!("expected Ok reply, got {other:?}"),
        }
    }

    #[test]
    fn trainer_failure_becomes_err_reply() {
        let input = format!("{}\n", serde_json::to_string(&task()).unwrap());
        let mut output = Vec::new();

        run_worker(Arc::new(FailingTrainer), Cursor::new(input), &mut output).unwrap();

        let reply: WorkerReply = serde_json::from_slice(&output).unwrap();
        match reply {
            WorkerReply::Err(message) => assert!(message.contains("resource exhausted")),
            other => panic!("expected Err reply, got {other:?}"),
        }
    }

    #[test]
    fn malformed_task_becomes_err_reply() {
        let mut output = Vec::new();
        run_worker(Arc::new(EchoTrainer), Cursor::new("not json\n"), &mut output).unwrap();

        let reply: WorkerReply = serde_json::from_slice(&output).unwrap();
        assert!(matches!(reply, WorkerReply::Err(ref m) if m.contains("malformed task")));
    }
}
