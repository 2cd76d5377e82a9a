//! Per-record upserts with a per-record error boundary
//!
//! Each record is validated, then upserted with retries for transient store
//! errors. A failure is recorded against the record and, depending on the
//! [`FailurePolicy`], either the file continues or the remaining records are
//! marked skipped.

use super::retry::RetryPolicy;
use super::FailurePolicy;
use crate::adapters::database::{ContainerStatus, DocumentStore};
use crate::domain::record::attribute_from_path;
use crate::domain::{ContainerSpec, Record, Result};
use crate::log_record_progress;
use std::sync::Arc;

/// What happened to one record
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// Stored, possibly after retries
    Upserted { id: String, attempts: usize },

    /// Not stored
    Failed {
        id: String,
        error: String,
        transient: bool,
        attempts: usize,
    },

    /// Not attempted because an earlier record aborted the file
    Skipped { id: String },
}

impl RecordOutcome {
    /// Id of the record this outcome belongs to
    pub fn id(&self) -> &str {
        match self {
            Self::Upserted { id, .. } | Self::Failed { id, .. } | Self::Skipped { id } => id,
        }
    }

    /// Whether the record was stored
    pub fn is_upserted(&self) -> bool {
        matches!(self, Self::Upserted { .. })
    }
}

/// Outcomes of one file's records, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// One entry per input record
    pub outcomes: Vec<RecordOutcome>,

    /// Whether the failure policy stopped the file early
    pub aborted: bool,
}

impl BatchOutcome {
    /// Number of records
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Records stored
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_upserted()).count()
    }

    /// Records that failed
    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    /// Records never attempted
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RecordOutcome::Skipped { .. }))
            .count()
    }

    /// Failed outcomes only
    pub fn failures(&self) -> impl Iterator<Item = &RecordOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RecordOutcome::Failed { .. }))
    }

    /// Whether every record was stored
    pub fn is_complete(&self) -> bool {
        self.succeeded() == self.total()
    }
}

/// Writes records to a store
pub struct UpsertOrchestrator {
    store: Arc<dyn DocumentStore>,
    retry: RetryPolicy,
    failure_policy: FailurePolicy,
}

impl UpsertOrchestrator {
    /// Create an orchestrator over `store`
    pub fn new(
        store: Arc<dyn DocumentStore>,
        retry: RetryPolicy,
        failure_policy: FailurePolicy,
    ) -> Self {
        Self {
            store,
            retry,
            failure_policy,
        }
    }

    /// Failure policy in effect
    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Create the container unless it exists
    ///
    /// An existing container keeps its partition key; a mismatch with the
    /// spec is only logged, and later upserts may then be rejected per record.
    pub async fn ensure_container(&self, spec: &ContainerSpec) -> Result<ContainerStatus> {
        let status = self.store.ensure_container(spec).await?;

        match &status {
            ContainerStatus::Created => tracing::info!(
                container = %spec.name,
                partition_key = %spec.partition_key_path(),
                throughput = spec.throughput,
                "Created container"
            ),
            ContainerStatus::Existing { partition_key_path } => {
                let existing = partition_key_path.as_deref().map(attribute_from_path);
                if existing != Some(spec.partition_attribute.as_str()) {
                    tracing::warn!(
                        container = %spec.name,
                        existing = ?partition_key_path,
                        expected = %spec.partition_key_path(),
                        "Existing container uses a different partition key"
                    );
                } else {
                    tracing::debug!(container = %spec.name, "Container already exists");
                }
            }
        }

        Ok(status)
    }

    /// Upsert records one at a time, in order
    ///
    /// `progress` is called after each attempted record with its 1-based
    /// position, the record count, and the outcome.
    pub async fn upsert_records<P>(
        &self,
        spec: &ContainerSpec,
        records: Vec<Record>,
        mut progress: P,
    ) -> BatchOutcome
    where
        P: FnMut(usize, usize, &RecordOutcome),
    {
        let total = records.len();
        let mut batch = BatchOutcome {
            outcomes: Vec::with_capacity(total),
            aborted: false,
        };
        let mut records = records.into_iter();

        while let Some(record) = records.next() {
            let index = batch.outcomes.len() + 1;
            let outcome = self.upsert_one(spec, record).await;
            log_record_progress!(index, total);
            progress(index, total, &outcome);

            let failed = matches!(outcome, RecordOutcome::Failed { .. });
            batch.outcomes.push(outcome);

            if failed && self.failure_policy == FailurePolicy::Abort {
                tracing::warn!(
                    container = %spec.name,
                    remaining = total - index,
                    "Aborting file after failed record"
                );
                batch.aborted = true;
                batch.outcomes.extend(records.by_ref().map(|r| RecordOutcome::Skipped {
                    id: r.id().unwrap_or_default().to_string(),
                }));
            }
        }

        batch
    }

    async fn upsert_one(&self, spec: &ContainerSpec, record: Record) -> RecordOutcome {
        let id = record.id().unwrap_or_default().to_string();

        let partition = match record.validate_for(&spec.partition_attribute) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(container = %spec.name, id = %id, error = %e, "Invalid record");
                return RecordOutcome::Failed {
                    id,
                    error: e.to_string(),
                    transient: false,
                    attempts: 0,
                };
            }
        };

        let store = &self.store;
        let name = spec.name.as_str();
        let partition = &partition;
        let record = &record;
        let (result, attempts) = self
            .retry
            .run(move || store.upsert_item(name, partition, record))
            .await;

        match result {
            Ok(()) => RecordOutcome::Upserted { id, attempts },
            Err(e) => {
                tracing::error!(
                    container = %spec.name,
                    id = %id,
                    attempts,
                    error = %e,
                    "Failed to upsert record"
                );
                RecordOutcome::Failed {
                    id,
                    transient: e.is_transient(),
                    error: e.to_string(),
                    attempts,
                }
            }
        }
    }
}
