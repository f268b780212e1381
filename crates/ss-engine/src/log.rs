//! Append-only result artifact.
//!
//! The artifact is the sole durable state of a scan: tab-separated UTF-8,
//! one fixed header line, then one line per completed evaluation. Rows are
//! never mutated or deleted. Each append opens, writes, and closes the
//! file, so a crash between appends loses at most the in-flight row.

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use ss_types::{LogError, ResultRow};

/// Owns the result artifact's lifecycle.
///
/// The scheduler funnels every append through a single coordinating thread,
/// so concurrent writers never exist in practice; the internal mutex
/// additionally serializes the full open-write-close for library users that
/// share a logger across threads directly.
pub struct ResultLogger {
    path: PathBuf,
    window: usize,
    guard: Mutex<()>,
}

impl ResultLogger {
    pub fn new(path: impl Into<PathBuf>, window: usize) -> Self {
        Self {
            path: path.into(),
            window,
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The fixed header line (column names embed the window length).
    pub fn header(&self) -> String {
        format!(
            "hidden_layer_sizes\tlearning_rate\tepochs\tav costs\tav costs last {w}\tav errorRate last {w}\tseconds",
            w = self.window
        )
    }

    /// Truncate the artifact and write the header line.
    ///
    /// Destructive: discards any prior results. Callers gate this behind an
    /// explicit configuration flag and invoke it at most once per fresh run.
    pub fn initialize(&self) -> Result<(), LogError> {
        let _lock = self.guard.lock();

        let mut file = File::create(&self.path).map_err(|source| LogError::Open {
            path: self.path.display().to_string(),
            source,
        })?;
        writeln!(file, "{}", self.header()).map_err(|source| LogError::Write {
            path: self.path.display().to_string(),
            source,
        })?;

        info!(path = %self.path.display(), "initialized result artifact");
        Ok(())
    }

    /// Append one row and close the file again.
    pub fn append(&self, row: &ResultRow) -> Result<(), LogError> {
        let _lock = self.guard.lock();

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| LogError::Open {
                path: self.path.display().to_string(),
                source,
            })?;
        writeln!(file, "{}", row.to_line()).map_err(|source| LogError::Write {
            path: self.path.display().to_string(),
            source,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ss_types::CandidateStructure;

    fn row(widths: &[u32]) -> ResultRow {
        ResultRow {
            structure: CandidateStructure::from_point(widths).unwrap(),
            learning_rate: 1e-3,
            epochs: 200,
            avg_cost_all: 0.4,
            avg_cost_tail: 0.2,
            avg_error_tail: 0.1,
            elapsed_seconds: 3.0,
        }
    }

    #[test]
    fn initialize_writes_exactly_one_header_line() {
        let dir = tempfile::tempdir().unwrap();
        let logger = ResultLogger::new(dir.path().join("results.tsv"), 200);

        logger.initialize().unwrap();

        let content = std::fs::read_to_string(logger.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], logger.header());
        assert!(lines[0].contains("av costs last 200"));
        assert!(lines[0].contains("av errorRate last 200"));
    }

    #[test]
    fn initialize_truncates_prior_content() {
        let dir = tempfile::tempdir().unwrap();
        let logger = ResultLogger::new(dir.path().join("results.tsv"), 50);

        logger.initialize().unwrap();
        logger.append(&row(&[16, 4])).unwrap();
        logger.append(&row(&[8])).unwrap();
        logger.initialize().unwrap();

        let content = std::fs::read_to_string(logger.path()).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn append_without_initialize_preserves_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.tsv");
        std::fs::write(&path, "header\n[1]\t0.001\t200\t1\t1\t1\t1\n").unwrap();

        let logger = ResultLogger::new(&path, 200);
        logger.append(&row(&[2])).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("[1]\t"));
        assert!(lines[2].starts_with("[2]\t"));
    }

    #[test]
    fn append_creates_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let logger = ResultLogger::new(dir.path().join("fresh.tsv"), 200);

        logger.append(&row(&[3, 3])).unwrap();

        let content = std::fs::read_to_string(logger.path()).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.starts_with("[3, 3]\t"));
    }

    #[test]
    fn unwritable_path_is_a_log_error() {
        let logger = ResultLogger::new("/nonexistent-dir/results.tsv", 200);
        assert!(matches!(logger.initialize(), Err(LogError::Open { .. })));
        assert!(matches!(logger.append(&row(&[1])), Err(LogError::Open { .. })));
    }
}
