//! Import summary and reporting

use super::orchestrator::BatchOutcome;
use crate::adapters::database::ContainerStatus;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;

/// How far a file got
#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    /// Records were handed to the store; see the batch outcome
    Imported {
        /// Whether the container was created by this run
        container: ContainerStatus,
        /// Per-record outcomes
        batch: BatchOutcome,
    },

    /// The file could not be mapped; nothing was written
    ParseFailed(String),

    /// The container could not be created or read; nothing was written
    ContainerFailed(String),
}

/// Result of importing one file
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    /// Source path
    pub path: PathBuf,

    /// Target container, when a name could be derived
    pub container: Option<String>,

    /// Outcome
    pub status: FileStatus,
}

impl FileReport {
    /// Records stored from this file
    pub fn succeeded(&self) -> usize {
        self.batch().map_or(0, BatchOutcome::succeeded)
    }

    /// Records that failed or were skipped
    pub fn unsuccessful(&self) -> usize {
        self.batch().map_or(0, |b| b.failed() + b.skipped())
    }

    /// Whether every record of the file was stored
    pub fn is_successful(&self) -> bool {
        self.batch().is_some_and(BatchOutcome::is_complete)
    }

    /// Batch outcome, for imported files
    pub fn batch(&self) -> Option<&BatchOutcome> {
        match &self.status {
            FileStatus::Imported { batch, .. } => Some(batch),
            _ => None,
        }
    }
}

/// Summary of an import run
#[derive(Debug, Clone)]
pub struct ImportSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration of the run
    pub duration: Duration,

    /// Whether records went to the in-memory store
    pub dry_run: bool,

    /// One report per located file, in processing order
    pub files: Vec<FileReport>,
}

impl ImportSummary {
    /// Create an empty summary starting now
    pub fn new(dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            duration: Duration::ZERO,
            dry_run,
            files: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Number of records across all imported files
    pub fn total_records(&self) -> usize {
        self.files
            .iter()
            .filter_map(FileReport::batch)
            .map(BatchOutcome::total)
            .sum()
    }

    /// Records stored
    pub fn succeeded(&self) -> usize {
        self.files.iter().map(FileReport::succeeded).sum()
    }

    /// Records that failed
    pub fn failed(&self) -> usize {
        self.files
            .iter()
            .filter_map(FileReport::batch)
            .map(BatchOutcome::failed)
            .sum()
    }

    /// Records skipped after an abort
    pub fn skipped(&self) -> usize {
        self.files
            .iter()
            .filter_map(FileReport::batch)
            .map(BatchOutcome::skipped)
            .sum()
    }

    /// Files that could not be imported at all
    pub fn failed_files(&self) -> usize {
        self.files.iter().filter(|f| f.batch().is_none()).count()
    }

    /// Containers created during the run
    pub fn containers_created(&self) -> usize {
        self.files
            .iter()
            .filter(|f| {
                matches!(
                    f.status,
                    FileStatus::Imported {
                        container: ContainerStatus::Created,
                        ..
                    }
                )
            })
            .count()
    }

    /// Check if the import was successful (every file, every record)
    pub fn is_successful(&self) -> bool {
        self.failed_files() == 0 && self.succeeded() == self.total_records()
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let total = self.total_records();
        if total == 0 {
            return 100.0;
        }
        (self.succeeded() as f64 / total as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            started_at = %self.started_at.to_rfc3339(),
            files = self.files.len(),
            failed_files = self.failed_files(),
            records = self.total_records(),
            succeeded = self.succeeded(),
            failed = self.failed(),
            skipped = self.skipped(),
            containers_created = self.containers_created(),
            duration_ms = self.duration.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            dry_run = self.dry_run,
            "Import completed"
        );

        for file in &self.files {
            match &file.status {
                FileStatus::ParseFailed(message) | FileStatus::ContainerFailed(message) => {
                    tracing::warn!(
                        file = %file.path.display(),
                        error = %message,
                        "File not imported"
                    );
                }
                FileStatus::Imported { batch, .. } if !batch.is_complete() => {
                    tracing::warn!(
                        file = %file.path.display(),
                        failed = batch.failed(),
                        skipped = batch.skipped(),
                        "File imported with errors"
                    );
                }
                FileStatus::Imported { .. } => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::import::RecordOutcome;

    fn imported(outcomes: Vec<RecordOutcome>) -> FileReport {
        FileReport {
            path: PathBuf::from("data/orders.csv"),
            container: Some("orders".to_string()),
            status: FileStatus::Imported {
                container: ContainerStatus::Created,
                batch: BatchOutcome {
                    outcomes,
                    aborted: false,
                },
            },
        }
    }

    fn ok(id: &str) -> RecordOutcome {
        RecordOutcome::Upserted {
            id: id.to_string(),
            attempts: 1,
        }
    }

    #[test]
    fn test_empty_summary() {
        let summary = ImportSummary::new(false);
        assert_eq!(summary.total_records(), 0);
        assert_eq!(summary.success_rate(), 100.0);
        assert!(summary.is_successful());
    }

    #[test]
    fn test_totals() {
        let mut summary = ImportSummary::new(false);
        summary.files.push(imported(vec![
            ok("0"),
            RecordOutcome::Failed {
                id: "1".to_string(),
                error: "boom".to_string(),
                transient: false,
                attempts: 1,
            },
            RecordOutcome::Skipped {
                id: "2".to_string(),
            },
            ok("3"),
        ]));
        summary.files.push(FileReport {
            path: PathBuf::from("data/broken.csv"),
            container: Some("broken".to_string()),
            status: FileStatus::ParseFailed("line 3".to_string()),
        });

        assert_eq!(summary.total_records(), 4);
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.failed_files(), 1);
        assert_eq!(summary.containers_created(), 1);
        assert_eq!(summary.success_rate(), 50.0);
        assert!(!summary.is_successful());
        assert_eq!(summary.files[0].unsuccessful(), 2);
    }

    #[test]
    fn test_header_only_file_is_successful() {
        let mut summary = ImportSummary::new(true);
        summary.files.push(imported(Vec::new()));
        assert!(summary.is_successful());
        assert!(summary.files[0].is_successful());
    }
}
