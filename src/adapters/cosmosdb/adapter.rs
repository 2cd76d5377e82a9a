//! Cosmos DB adapter implementing the document store trait

use crate::adapters::cosmosdb::client::CosmosDbClient;
use crate::adapters::database::traits::{ContainerInfo, DocumentStore};
use crate::domain::{ContainerSpec, PartitionValue, Record, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Cosmos DB implementation of [`DocumentStore`]
pub struct CosmosDbAdapter {
    client: CosmosDbClient,
}

impl CosmosDbAdapter {
    /// Create a new Cosmos DB adapter
    pub fn new(client: CosmosDbClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentStore for CosmosDbAdapter {
    async fn list_databases(&self) -> Result<Vec<String>> {
        self.client.list_databases().await
    }

    async fn read_container(&self, name: &str) -> Result<Option<ContainerInfo>> {
        tracing::debug!(container = %name, "Reading container properties");
        self.client.read_container(name).await
    }

    async fn create_container(&self, spec: &ContainerSpec) -> Result<()> {
        tracing::info!(
            container = %spec.name,
            partition_key = %spec.partition_key_path(),
            throughput = spec.throughput,
            "Creating container"
        );
        self.client.create_container(spec).await
    }

    async fn upsert_item(
        &self,
        container: &str,
        partition: &PartitionValue,
        record: &Record,
    ) -> Result<()> {
        self.client.upsert_item(container, partition, record).await
    }

    async fn query_items(&self, container: &str, query: &str) -> Result<Vec<Value>> {
        tracing::debug!(container = %container, query = %query, "Running cross-partition query");
        self.client.query_items(container, query).await
    }

    fn database_name(&self) -> &str {
        self.client.database_name()
    }
}
