//! # ss-engine
//!
//! Execution engine for SlimScan: drives the generated candidate set
//! through the training adapter, quality summarizer, and result logger
//! under one of three interchangeable scheduling strategies (serial,
//! thread-bounded, process-bounded), all respecting the configured
//! concurrency budget.

pub mod adapter;
pub mod log;
pub mod runner;
pub mod synthetic;
pub mod worker;

pub use adapter::{Trainer, TrainingAdapter};
pub use log::ResultLogger;
pub use runner::ScanRunner;
pub use synthetic::SyntheticTrainer;
pub use worker::{run_worker, WorkerReply};
