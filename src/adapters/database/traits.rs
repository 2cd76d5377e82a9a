//! Document store abstraction
//!
//! This module defines the trait the import pipeline and the query façade use
//! to reach the database. Connection handling, retries inside the SDK, and
//! query semantics belong to the implementation, not to callers.

use crate::domain::{ContainerSpec, CosmosCsvError, PartitionValue, Record, Result, StoreError};
use async_trait::async_trait;
use serde_json::Value;

/// Properties of an existing container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    /// Container name
    pub name: String,

    /// First partition key path, e.g. `/customer`
    pub partition_key_path: Option<String>,
}

/// Outcome of [`DocumentStore::ensure_container`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerStatus {
    /// The container was created by this call
    Created,

    /// The container was already there and was left untouched
    Existing {
        /// Partition key path of the existing container
        partition_key_path: Option<String>,
    },
}

/// Document database operations consumed by cosmos-csv
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Names of every database visible to the credential
    async fn list_databases(&self) -> Result<Vec<String>>;

    /// Read container properties, `None` when the container does not exist
    async fn read_container(&self, name: &str) -> Result<Option<ContainerInfo>>;

    /// Create a container with the descriptor's partition key and throughput
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the container already exists.
    async fn create_container(&self, spec: &ContainerSpec) -> Result<()>;

    /// Insert the record, or fully replace the one with the same id
    async fn upsert_item(
        &self,
        container: &str,
        partition: &PartitionValue,
        record: &Record,
    ) -> Result<()>;

    /// Run a query across all partitions and collect every result
    async fn query_items(&self, container: &str, query: &str) -> Result<Vec<Value>>;

    /// Name of the selected database
    fn database_name(&self) -> &str;

    /// Create the container unless it already exists
    ///
    /// An existing container is never altered, even when its partition key
    /// differs from the descriptor.
    async fn ensure_container(&self, spec: &ContainerSpec) -> Result<ContainerStatus> {
        if let Some(info) = self.read_container(&spec.name).await? {
            return Ok(ContainerStatus::Existing {
                partition_key_path: info.partition_key_path,
            });
        }

        match self.create_container(spec).await {
            Ok(()) => Ok(ContainerStatus::Created),
            // Lost a race with another writer
            Err(CosmosCsvError::Store(StoreError::Conflict(_))) => {
                let info = self.read_container(&spec.name).await?;
                Ok(ContainerStatus::Existing {
                    partition_key_path: info.and_then(|i| i.partition_key_path),
                })
            }
            Err(e) => Err(e),
        }
    }
}
