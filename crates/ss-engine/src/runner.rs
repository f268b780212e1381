//! Execution scheduler.
//!
//! Drives the generated candidate set through adapter → summarizer →
//! logger under one of three strategies. Serial walks the candidates in
//! sorted order on the calling thread; the threaded and multiprocess
//! strategies share a single bounded pool: N worker threads pull tasks
//! from a channel and funnel every outcome back to the coordinating
//! thread, which is the only writer of the result artifact.

use crossbeam_channel as channel;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use ss_search::{generate, summarize};
use ss_types::{
    EvalError, EvaluationOutcome, EvaluationTask, ExecStrategy, ScanConfig, ScanError, ScanReport,
    ScanResult, TaskFailure, TaskState,
};

use crate::adapter::{Trainer, TrainingAdapter};
use crate::log::ResultLogger;
use crate::worker::evaluate_in_subprocess;

/// How a pool worker executes one task.
enum WorkerBackend<'a> {
    /// Call the trainer on the worker thread (shared-memory regime).
    InProcess(&'a TrainingAdapter),
    /// Spawn one isolated child process per task and marshal the outcome
    /// back (isolated regime).
    Subprocess(&'a Path),
}

impl WorkerBackend<'_> {
    fn execute(&self, task: &EvaluationTask) -> Result<EvaluationOutcome, EvalError> {
        match self {
            Self::InProcess(adapter) => adapter.evaluate(task),
            Self::Subprocess(program) => evaluate_in_subprocess(program, task),
        }
    }
}

/// Message from a pool worker to the coordinating thread.
enum WorkerMessage {
    Finished {
        task: EvaluationTask,
        result: Result<EvaluationOutcome, EvalError>,
    },
    /// The active-worker gauge exceeded the budget — a scheduler defect,
    /// never a recoverable runtime condition.
    BudgetViolation { active: usize },
}

/// Orchestrates one scan run.
pub struct ScanRunner {
    config: ScanConfig,
    adapter: TrainingAdapter,
    /// Worker executable for the multiprocess strategy.
    worker_program: Option<PathBuf>,
    states: DashMap<Uuid, TaskState>,
}

impl ScanRunner {
    pub fn new(config: ScanConfig, trainer: Arc<dyn Trainer>) -> Self {
        Self {
            config,
            adapter: TrainingAdapter::new(trainer),
            worker_program: None,
            states: DashMap::new(),
        }
    }

    /// Set the executable the multiprocess strategy spawns per task.
    pub fn with_worker_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.worker_program = Some(program.into());
        self
    }

    /// Run the full sweep and return the aggregate report.
    ///
    /// Per-candidate failures are recorded in the report and do not abort
    /// the run; generation, artifact, and budget errors do.
    pub fn run(&self) -> ScanResult<ScanReport> {
        self.config.validate().map_err(ScanError::Generation)?;
        self.states.clear();

        let candidates = generate(&self.config.ranges)?;
        let logger = ResultLogger::new(&self.config.artifact, self.config.window);
        if self.config.init_artifact {
            logger.initialize()?;
        }

        let tasks: Vec<EvaluationTask> = candidates
            .into_iter()
            .map(|structure| {
                EvaluationTask::new(structure, self.config.learning_rate, self.config.epochs)
            })
            .collect();
        for task in &tasks {
            self.states.insert(task.id, TaskState::Pending);
        }

        info!(
            run_id = %self.config.id,
            name = %self.config.name,
            strategy = ?self.config.strategy,
            tasks = tasks.len(),
            "starting structure scan"
        );

        let mut report = ScanReport::started(self.config.id, tasks.len());
        let started = Instant::now();

        match self.config.strategy {
            ExecStrategy::Serial => self.run_serial(tasks, &logger, &mut report)?,
            ExecStrategy::Threaded { max_threads } => {
                let backend = WorkerBackend::InProcess(&self.adapter);
                self.run_bounded(max_threads, &backend, tasks, &logger, &mut report)?;
            }
            ExecStrategy::Multiprocess { max_processes } => {
                let program = self.worker_program.as_deref().ok_or_else(|| {
                    ScanError::Internal(
                        "multiprocess strategy requires a worker program".to_string(),
                    )
                })?;
                let backend = WorkerBackend::Subprocess(program);
                self.run_bounded(max_processes, &backend, tasks, &logger, &mut report)?;
            }
        }

        // Every dispatched task must have reached a terminal state by now;
        // anything still Pending or Running was silently dropped.
        let lost = self
            .states
            .iter()
            .filter(|entry| !entry.value().is_terminal())
            .count();
        if lost > 0 {
            return Err(ScanError::Internal(format!(
                "{lost} tasks never reached a terminal state"
            )));
        }

        report.mark_finished(started.elapsed().as_secs_f64());
        info!(
            run_id = %self.config.id,
            completed = report.completed,
            failed = report.failed,
            elapsed_seconds = report.elapsed_seconds,
            "structure scan finished"
        );
        Ok(report)
    }

    /// One task at a time, candidate-sorted order, same settle path as the
    /// concurrent strategies.
    fn run_serial(
        &self,
        tasks: Vec<EvaluationTask>,
        logger: &ResultLogger,
        report: &mut ScanReport,
    ) -> ScanResult<()> {
        for task in tasks {
            self.states.insert(task.id, TaskState::Running);
            let result = self.adapter.evaluate(&task);
            self.settle(task, result, logger, report)?;
        }
        Ok(())
    }

    /// Bounded pool shared by the threaded and multiprocess strategies.
    ///
    /// Pool size mechanically enforces the concurrency budget; the atomic
    /// gauge cross-checks it. The coordinating thread drains the results
    /// channel — summarize + append happen only here — and the channel
    /// disconnecting after every worker exits is the join/drain barrier:
    /// exactly one terminal message per dispatched task unless the run
    /// aborts.
    fn run_bounded(
        &self,
        max_concurrency: usize,
        backend: &WorkerBackend<'_>,
        tasks: Vec<EvaluationTask>,
        logger: &ResultLogger,
        report: &mut ScanReport,
    ) -> ScanResult<()> {
        let (task_tx, task_rx) = channel::unbounded::<EvaluationTask>();
        let (msg_tx, msg_rx) = channel::unbounded::<WorkerMessage>();
        let active = AtomicUsize::new(0);
        let aborted = AtomicBool::new(false);

        for task in tasks {
            task_tx
                .send(task)
                .map_err(|_| ScanError::Internal("task channel closed before dispatch".into()))?;
        }
        drop(task_tx);

        thread::scope(|scope| {
            for _ in 0..max_concurrency {
                let task_rx = task_rx.clone();
                let msg_tx = msg_tx.clone();
                let active = &active;
                let aborted = &aborted;
                scope.spawn(move || {
                    while let Ok(task) = task_rx.recv() {
                        // Queued tasks behind a fatal error are abandoned,
                        // not evaluated.
                        if aborted.load(Ordering::SeqCst) {
                            break;
                        }

                        let now_active = active.fetch_add(1, Ordering::SeqCst) + 1;
                        if now_active > max_concurrency {
                            active.fetch_sub(1, Ordering::SeqCst);
                            let _ = msg_tx.send(WorkerMessage::BudgetViolation { active: now_active });
                            break;
                        }

                        self.states.insert(task.id, TaskState::Running);
                        let result = backend.execute(&task);
                        active.fetch_sub(1, Ordering::SeqCst);

                        if msg_tx.send(WorkerMessage::Finished { task, result }).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(msg_tx);

            let mut fatal: Option<ScanError> = None;
            for message in msg_rx.iter() {
                match message {
                    WorkerMessage::Finished { task, result } => {
                        if fatal.is_some() {
                            // Aborting: the in-flight result is lost by design.
                            continue;
                        }
                        if let Err(err) = self.settle(task, result, logger, report) {
                            aborted.store(true, Ordering::SeqCst);
                            fatal = Some(err);
                        }
                    }
                    WorkerMessage::BudgetViolation { active } => {
                        aborted.store(true, Ordering::SeqCst);
                        fatal.get_or_insert(ScanError::BudgetExceeded {
                            active,
                            max: max_concurrency,
                        });
                    }
                }
            }

            match fatal {
                Some(err) => Err(err),
                None => Ok(()),
            }
        })
    }

    /// Route one terminal result: summarize and append on success, record
    /// and continue on per-task failure. Only artifact errors escape.
    fn settle(
        &self,
        task: EvaluationTask,
        result: Result<EvaluationOutcome, EvalError>,
        logger: &ResultLogger,
        report: &mut ScanReport,
    ) -> ScanResult<()> {
        let summarized = result.and_then(|outcome| summarize(&outcome, self.config.window));
        match summarized {
            Ok(row) => {
                logger.append(&row)?;
                self.states.insert(task.id, TaskState::Completed);
                report.record_completed();
            }
            Err(err) => {
                warn!(
                    structure = %task.structure,
                    learning_rate = task.learning_rate,
                    epochs = task.epochs,
                    error = %err,
                    "candidate evaluation failed"
                );
                self.states.insert(task.id, TaskState::Failed);
                report.record_failure(TaskFailure {
                    structure: task.structure.clone(),
                    learning_rate: task.learning_rate,
                    epochs: task.epochs,
                    error: err.to_string(),
                });
            }
        }
        Ok(())
    }
}
