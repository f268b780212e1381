use thiserror::Error;

/// Main error type for the SlimScan system
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvalError),

    #[error("Log error: {0}")]
    Log(#[from] LogError),

    #[error("Concurrency budget exceeded: {active} active workers, budget {max}")]
    BudgetExceeded { active: usize, max: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Candidate-generation and configuration errors.
///
/// These fail fast: nothing is dispatched and nothing is written to the
/// result artifact when generation fails.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Invalid layer range at position {position}: lo {lo} > hi {hi}")]
    InvalidRange { position: usize, lo: u32, hi: u32 },

    #[error("No layer ranges configured")]
    NoRanges,

    #[error("Epochs must be positive")]
    ZeroEpochs,

    #[error("Learning rate must be positive, got {0}")]
    NonPositiveLearningRate(f64),

    #[error("Concurrency budget must be at least 1")]
    ZeroConcurrency,
}

/// Per-task evaluation failures.
///
/// Isolated to the task that raised them: the task is marked Failed, no
/// result row is written, and the run continues.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Training failed for {structure}: {message}")]
    TrainingFailed { structure: String, message: String },

    #[error("Training returned zero-length sequences for {structure}")]
    EmptySequence { structure: String },

    #[error("Worker protocol error: {0}")]
    WorkerProtocol(String),
}

/// Result-artifact failures. Fatal to the run: if results cannot be
/// persisted there is no point burning compute on further tasks.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Failed to open result artifact {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write result artifact {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for SlimScan operations
pub type ScanResult<T> = Result<T, ScanError>;
