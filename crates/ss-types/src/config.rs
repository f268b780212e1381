//! Run configuration for a structure scan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::errors::GenerationError;

/// Unique scan-run identifier.
pub type ScanId = Uuid;

/// Default trailing-window length for the quality averages.
pub const DEFAULT_WINDOW: usize = 200;

/// Closed integer interval for one hidden-layer position.
///
/// `lo` may be 0, meaning "this layer may be absent" — grid points that pick
/// 0 here have the position stripped from the candidate structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRange {
    pub lo: u32,
    pub hi: u32,
}

impl LayerRange {
    pub fn new(lo: u32, hi: u32) -> Self {
        Self { lo, hi }
    }

    /// Number of grid values in the interval (closed on both ends).
    pub fn span(&self) -> usize {
        (self.hi.saturating_sub(self.lo)) as usize + 1
    }
}

/// Which execution strategy drives the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecStrategy {
    /// One task at a time, in candidate-sorted order.
    Serial,
    /// Shared-memory worker threads, at most `max_threads` active.
    Threaded { max_threads: usize },
    /// Isolated worker processes, at most `max_processes` alive.
    Multiprocess { max_processes: usize },
}

impl ExecStrategy {
    /// The concurrency budget this strategy is allowed to use.
    pub fn max_concurrency(&self) -> usize {
        match self {
            Self::Serial => 1,
            Self::Threaded { max_threads } => *max_threads,
            Self::Multiprocess { max_processes } => *max_processes,
        }
    }
}

impl Default for ExecStrategy {
    fn default() -> Self {
        Self::Serial
    }
}

/// Top-level configuration for one scan run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub id: ScanId,
    pub name: String,

    /// One inclusive range per hidden-layer position (arity K of the grid).
    pub ranges: Vec<LayerRange>,

    pub learning_rate: f64,
    pub epochs: u32,

    /// Trailing-window length W for the tail quality averages.
    pub window: usize,

    pub strategy: ExecStrategy,

    /// Path of the tab-separated result artifact.
    pub artifact: PathBuf,

    /// Truncate the artifact and write a fresh header at run start.
    /// Destructive — discards prior results — so it defaults to `false` and
    /// must be opted into explicitly.
    pub init_artifact: bool,

    pub created_at: DateTime<Utc>,
}

impl ScanConfig {
    pub fn new(name: impl Into<String>, ranges: Vec<LayerRange>, artifact: impl Into<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            ranges,
            learning_rate: 1e-3,
            epochs: 200,
            window: DEFAULT_WINDOW,
            strategy: ExecStrategy::default(),
            artifact: artifact.into(),
            init_artifact: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn with_epochs(mut self, epochs: u32) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_strategy(mut self, strategy: ExecStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_init_artifact(mut self, init: bool) -> Self {
        self.init_artifact = init;
        self
    }

    /// Fail-fast validation, run before anything is dispatched or written.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.ranges.is_empty() {
            return Err(GenerationError::NoRanges);
        }
        for (position, range) in self.ranges.iter().enumerate() {
            if range.lo > range.hi {
                return Err(GenerationError::InvalidRange {
                    position,
                    lo: range.lo,
                    hi: range.hi,
                });
            }
        }
        if self.epochs == 0 {
            return Err(GenerationError::ZeroEpochs);
        }
        if self.learning_rate <= 0.0 {
            return Err(GenerationError::NonPositiveLearningRate(self.learning_rate));
        }
        if self.strategy.max_concurrency() == 0 {
            return Err(GenerationError::ZeroConcurrency);
        }
        Ok(())
    }
}
