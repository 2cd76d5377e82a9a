//! Import coordinator - drives one run over the data directory

use super::orchestrator::{RecordOutcome, UpsertOrchestrator};
use super::retry::RetryPolicy;
use super::summary::{FileReport, FileStatus, ImportSummary};
use crate::adapters::database::DocumentStore;
use crate::config::{AppConfig, ImportConfig};
use crate::core::locator::CsvLocator;
use crate::core::mapper::{container_name_for, map_csv_file, MapperOptions};
use crate::domain::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Progress callbacks for an import run
///
/// Positions are 1-based. All methods default to doing nothing.
pub trait ImportObserver {
    /// All input files have been located
    fn files_located(&mut self, _files: &[PathBuf]) {}

    /// Processing of a file begins
    fn file_started(&mut self, _index: usize, _total: usize, _path: &Path) {}

    /// One record was attempted
    fn record_processed(&mut self, _index: usize, _total: usize, _outcome: &RecordOutcome) {}

    /// A file is done, successfully or not
    fn file_finished(&mut self, _report: &FileReport) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl ImportObserver for SilentObserver {}

/// Runs the import pipeline
pub struct ImportCoordinator {
    config: ImportConfig,
    orchestrator: UpsertOrchestrator,
    mapper_options: MapperOptions,
}

impl ImportCoordinator {
    /// Create a coordinator writing to `store`
    pub fn new(config: &AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        let orchestrator = UpsertOrchestrator::new(
            store,
            RetryPolicy::from(&config.retry),
            config.import.failure_policy,
        );

        Self {
            config: config.import.clone(),
            orchestrator,
            mapper_options: MapperOptions {
                id_strategy: config.import.id_strategy.clone(),
            },
        }
    }

    /// Import every located file, one after another
    ///
    /// A file that cannot be mapped or whose container cannot be prepared is
    /// reported and skipped; the run continues with the next file.
    ///
    /// # Errors
    ///
    /// Fails only when the data directory itself is missing or not a
    /// directory. Entries that cannot be read while walking are logged and
    /// skipped.
    pub async fn run(&self, observer: &mut dyn ImportObserver) -> Result<ImportSummary> {
        let start_time = Instant::now();
        let mut summary = ImportSummary::new(self.config.dry_run);

        let mut files = Vec::new();
        for entry in CsvLocator::new(&self.config.data_dir)
            .with_extensions(self.config.extensions.iter().cloned())
            .locate()?
        {
            match entry {
                Ok(path) => files.push(path),
                // Dangling links and unreadable subdirectories do not stop the run
                Err(e) => tracing::warn!(error = %e, "Skipping unreadable directory entry"),
            }
        }

        tracing::info!(
            data_dir = %self.config.data_dir.display(),
            files = files.len(),
            failure_policy = %self.orchestrator.failure_policy(),
            id_strategy = %self.mapper_options.id_strategy,
            "Starting import"
        );
        observer.files_located(&files);

        let total = files.len();
        for (i, path) in files.iter().enumerate() {
            observer.file_started(i + 1, total, path);
            let report = self.import_file(path, observer).await;
            observer.file_finished(&report);
            summary.files.push(report);
        }

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    async fn import_file(&self, path: &Path, observer: &mut dyn ImportObserver) -> FileReport {
        let container = container_name_for(path).ok();
        let report = |status| FileReport {
            path: path.to_path_buf(),
            container: container.clone(),
            status,
        };

        let table = match map_csv_file(path, &self.mapper_options) {
            Ok(table) => table,
            Err(e) => {
                tracing::error!(file = %path.display(), error = %e, "Failed to parse file");
                return report(FileStatus::ParseFailed(e.to_string()));
            }
        };

        let spec = table.container_spec(self.config.throughput);
        let container_status = match self.orchestrator.ensure_container(&spec).await {
            Ok(status) => status,
            Err(e) => {
                tracing::error!(
                    file = %path.display(),
                    container = %spec.name,
                    error = %e,
                    "Failed to prepare container"
                );
                return report(FileStatus::ContainerFailed(e.to_string()));
            }
        };

        tracing::info!(
            file = %path.display(),
            container = %spec.name,
            partition_key = %spec.partition_key_path(),
            records = table.len(),
            "Importing file"
        );

        let batch = self
            .orchestrator
            .upsert_records(&spec, table.records, |index, total, outcome| {
                observer.record_processed(index, total, outcome)
            })
            .await;

        report(FileStatus::Imported {
            container: container_status,
            batch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl ImportObserver for Recorder {
        fn file_started(&mut self, index: usize, total: usize, _path: &Path) {
            self.events.push(format!("file {index}/{total}"));
        }

        fn record_processed(&mut self, index: usize, total: usize, _outcome: &RecordOutcome) {
            self.events.push(format!("record {index}/{total}"));
        }
    }

    fn config(dir: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.cosmosdb.database_name = "db".to_string();
        config.import.data_dir = dir.to_path_buf();
        config
    }

    #[tokio::test]
    async fn test_progress_events_in_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.csv"), "k,v\nx,1\ny,2\n").unwrap();
        fs::write(dir.path().join("b.csv"), "k,v\nz,3\n").unwrap();

        let store = Arc::new(MemoryStore::new("db"));
        let coordinator = ImportCoordinator::new(&config(dir.path()), store);
        let mut recorder = Recorder::default();
        let summary = coordinator.run(&mut recorder).await.unwrap();

        assert_eq!(
            recorder.events,
            vec!["file 1/2", "record 1/2", "record 2/2", "file 2/2", "record 1/1"]
        );
        assert_eq!(summary.succeeded(), 3);
    }

    #[tokio::test]
    async fn test_missing_data_dir_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new("db"));
        let coordinator = ImportCoordinator::new(&config(&dir.path().join("absent")), store);
        assert!(coordinator.run(&mut SilentObserver).await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dangling_link_does_not_stop_the_run() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("orders.csv"), "customer\nAlice\n").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.csv"), dir.path().join("zz_link.csv"))
            .unwrap();

        let store = Arc::new(MemoryStore::new("db"));
        let coordinator = ImportCoordinator::new(&config(dir.path()), store.clone());
        let summary = coordinator.run(&mut SilentObserver).await.unwrap();

        assert_eq!(summary.files.len(), 1);
        assert!(summary.is_successful());
        assert_eq!(store.document_count("orders"), 1);
    }

    #[tokio::test]
    async fn test_empty_data_dir() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new("db"));
        let coordinator = ImportCoordinator::new(&config(dir.path()), store);
        let summary = coordinator.run(&mut SilentObserver).await.unwrap();
        assert!(summary.files.is_empty());
        assert!(summary.is_successful());
    }
}
