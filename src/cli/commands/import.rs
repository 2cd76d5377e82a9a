//! Import command implementation
//!
//! Imports every input file under the data directory into one container per
//! file, printing progress as it goes.

use super::{connect, report_failure, EXIT_PARTIAL, EXIT_SUCCESS};
use crate::adapters::database::StoreMode;
use crate::config::AppConfig;
use crate::core::import::{
    FailurePolicy, FileReport, FileStatus, ImportCoordinator, ImportObserver, ImportSummary,
    RecordOutcome,
};
use crate::core::mapper::IdStrategy;
use clap::Args;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Failures listed per file before the output is truncated
const MAX_LISTED_FAILURES: usize = 10;

/// Arguments for the import command
#[derive(Args, Debug, Default)]
pub struct ImportArgs {
    /// Directory to scan instead of the configured one
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Map and validate files without writing to Cosmos DB
    #[arg(long)]
    pub dry_run: bool,

    /// Stop a file at its first failed record
    #[arg(long)]
    pub abort_on_error: bool,

    /// Identifier strategy (positional, content_hash, column:<name>)
    #[arg(long, value_name = "STRATEGY")]
    pub id_strategy: Option<IdStrategy>,
}

impl ImportArgs {
    /// Execute the import command
    pub async fn execute(&self, config: &AppConfig) -> anyhow::Result<i32> {
        tracing::info!("Starting import command");
        let config = self.apply_overrides(config);

        if config.import.dry_run {
            tracing::info!("Dry run mode enabled - no data will be written");
            println!("🔍 DRY RUN MODE - No data will be written to the database");
            println!();
        }

        let store = match connect(&config, StoreMode::for_import(&config.import)).await {
            Ok(store) => store,
            Err(code) => return Ok(code),
        };

        let coordinator = ImportCoordinator::new(&config, store);
        let mut progress = ConsoleProgress::new(io::stdout());
        let summary = match coordinator.run(&mut progress).await {
            Ok(summary) => summary,
            Err(e) => return Ok(report_failure("Import", &e)),
        };

        let mut out = io::stdout().lock();
        render_summary(&summary, &mut out)?;
        out.flush()?;

        Ok(if summary.is_successful() {
            EXIT_SUCCESS
        } else {
            EXIT_PARTIAL
        })
    }

    fn apply_overrides(&self, config: &AppConfig) -> AppConfig {
        let mut config = config.clone();

        if let Some(dir) = &self.data_dir {
            tracing::info!(data_dir = %dir.display(), "Overriding data directory from CLI");
            config.import.data_dir = dir.clone();
        }
        if self.dry_run {
            config.import.dry_run = true;
        }
        if self.abort_on_error {
            config.import.failure_policy = FailurePolicy::Abort;
        }
        if let Some(strategy) = &self.id_strategy {
            config.import.id_strategy = strategy.clone();
        }

        config
    }
}

/// Prints progress lines as the import runs
pub struct ConsoleProgress<W: Write> {
    out: W,
}

impl<W: Write> ConsoleProgress<W> {
    /// Print to `out`
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

// Console output is best effort; a closed stdout must not fail the import.
impl<W: Write> ImportObserver for ConsoleProgress<W> {
    fn files_located(&mut self, files: &[PathBuf]) {
        if files.is_empty() {
            let _ = writeln!(self.out, "No input files found.");
        }
    }

    fn file_started(&mut self, index: usize, total: usize, path: &Path) {
        let _ = writeln!(
            self.out,
            "----------- Starting file {index}/{total} -----------"
        );
        let _ = writeln!(self.out, "{}", path.display());
    }

    fn record_processed(&mut self, index: usize, total: usize, outcome: &RecordOutcome) {
        let _ = match outcome {
            RecordOutcome::Upserted { .. } => {
                writeln!(self.out, "Record {index}/{total} inserted successfully.")
            }
            RecordOutcome::Failed { id, error, .. } => {
                writeln!(self.out, "Record {index}/{total} failed (id {id}): {error}")
            }
            RecordOutcome::Skipped { .. } => Ok(()),
        };
    }

    fn file_finished(&mut self, report: &FileReport) {
        let _ = match &report.status {
            FileStatus::ParseFailed(message) => {
                writeln!(self.out, "❌ File skipped, could not be parsed: {message}")
            }
            FileStatus::ContainerFailed(message) => {
                writeln!(self.out, "❌ File skipped, container unavailable: {message}")
            }
            FileStatus::Imported { batch, .. } if batch.aborted => writeln!(
                self.out,
                "⚠️  File aborted, {} remaining record(s) skipped",
                batch.skipped()
            ),
            FileStatus::Imported { .. } => Ok(()),
        };
        let _ = self.out.flush();
    }
}

/// Write the end-of-run summary
pub fn render_summary<W: Write>(summary: &ImportSummary, out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "📊 Import Summary:")?;
    writeln!(
        out,
        "  Files: {} ({} not imported)",
        summary.files.len(),
        summary.failed_files()
    )?;
    writeln!(out, "  Records: {}", summary.total_records())?;
    writeln!(out, "  Upserted: {}", summary.succeeded())?;
    writeln!(out, "  Failed: {}", summary.failed())?;
    writeln!(out, "  Skipped: {}", summary.skipped())?;
    writeln!(out, "  Containers Created: {}", summary.containers_created())?;
    writeln!(out, "  Duration: {:.2}s", summary.duration.as_secs_f64())?;
    writeln!(out, "  Success Rate: {:.2}%", summary.success_rate())?;
    writeln!(out)?;

    let unsuccessful: Vec<&FileReport> = summary
        .files
        .iter()
        .filter(|f| !f.is_successful())
        .collect();

    if !unsuccessful.is_empty() {
        writeln!(out, "⚠️  Errors encountered:")?;
        for file in unsuccessful {
            writeln!(out, "  - {}", file.path.display())?;
            match &file.status {
                FileStatus::ParseFailed(message) | FileStatus::ContainerFailed(message) => {
                    writeln!(out, "    {message}")?;
                }
                FileStatus::Imported { batch, .. } => {
                    let failures: Vec<_> = batch.failures().collect();
                    for failure in failures.iter().take(MAX_LISTED_FAILURES) {
                        if let RecordOutcome::Failed { id, error, .. } = failure {
                            writeln!(out, "    id {id}: {error}")?;
                        }
                    }
                    if failures.len() > MAX_LISTED_FAILURES {
                        writeln!(
                            out,
                            "    ... and {} more failures",
                            failures.len() - MAX_LISTED_FAILURES
                        )?;
                    }
                }
            }
        }
        writeln!(out)?;
    }

    if summary.is_successful() {
        writeln!(out, "✅ Import completed successfully!")?;
    } else {
        writeln!(out, "⚠️  Import completed with failures")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::ContainerStatus;
    use crate::config::secret_key;
    use crate::core::import::BatchOutcome;
    use std::fs;
    use tempfile::TempDir;

    fn dry_run_config(dir: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.cosmosdb.endpoint = "https://test.documents.azure.com:443/".to_string();
        config.cosmosdb.key = secret_key("dGVzdA==".to_string());
        config.cosmosdb.database_name = "imports".to_string();
        config.import.data_dir = dir.to_path_buf();
        config.import.dry_run = true;
        config
    }

    fn output(progress: ConsoleProgress<Vec<u8>>) -> String {
        String::from_utf8(progress.into_inner()).unwrap()
    }

    #[test]
    fn test_progress_lines() {
        let mut progress = ConsoleProgress::new(Vec::new());
        progress.file_started(1, 2, Path::new("data/orders.csv"));
        progress.record_processed(
            1,
            2,
            &RecordOutcome::Upserted {
                id: "0".to_string(),
                attempts: 1,
            },
        );

        let text = output(progress);
        assert!(text.contains("----------- Starting file 1/2 -----------"));
        assert!(text.contains("Record 1/2 inserted successfully."));
    }

    #[test]
    fn test_no_files_message() {
        let mut progress = ConsoleProgress::new(Vec::new());
        progress.files_located(&[]);
        assert!(output(progress).contains("No input files found."));
    }

    #[test]
    fn test_summary_lists_failures() {
        let mut summary = ImportSummary::new(false);
        summary.files.push(FileReport {
            path: PathBuf::from("data/orders.csv"),
            container: Some("orders".to_string()),
            status: FileStatus::Imported {
                container: ContainerStatus::Created,
                batch: BatchOutcome {
                    outcomes: vec![RecordOutcome::Failed {
                        id: "3".to_string(),
                        error: "Invalid document: too large".to_string(),
                        transient: false,
                        attempts: 1,
                    }],
                    aborted: false,
                },
            },
        });

        let mut out = Vec::new();
        render_summary(&summary, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Failed: 1"));
        assert!(text.contains("id 3: Invalid document: too large"));
        assert!(text.contains("Import completed with failures"));
    }

    #[test]
    fn test_overrides() {
        let dir = TempDir::new().unwrap();
        let args = ImportArgs {
            data_dir: Some(dir.path().to_path_buf()),
            dry_run: true,
            abort_on_error: true,
            id_strategy: Some(IdStrategy::ContentHash),
        };

        let config = args.apply_overrides(&AppConfig::default());
        assert_eq!(config.import.data_dir, dir.path());
        assert!(config.import.dry_run);
        assert_eq!(config.import.failure_policy, FailurePolicy::Abort);
        assert_eq!(config.import.id_strategy, IdStrategy::ContentHash);
    }

    #[tokio::test]
    async fn test_dry_run_import_succeeds() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("orders.csv"), "id,customer\n5,Alice\n").unwrap();

        let code = ImportArgs::default()
            .execute(&dry_run_config(dir.path()))
            .await
            .unwrap();
        assert_eq!(code, EXIT_SUCCESS);
    }

    #[tokio::test]
    async fn test_dry_run_with_broken_file_is_partial() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("good.csv"), "k\nv\n").unwrap();
        fs::write(dir.path().join("bad.csv"), "a,b\n1\n").unwrap();

        let code = ImportArgs::default()
            .execute(&dry_run_config(dir.path()))
            .await
            .unwrap();
        assert_eq!(code, EXIT_PARTIAL);
    }
}
