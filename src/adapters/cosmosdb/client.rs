//! Cosmos DB client implementation
//!
//! Thin wrapper over the `azure_data_cosmos` SDK. SDK errors are mapped onto
//! [`StoreError`] here so nothing above this module sees SDK types.

use crate::adapters::database::traits::ContainerInfo;
use crate::config::CosmosDbConfig;
use crate::domain::{ContainerSpec, CosmosCsvError, PartitionValue, Record, Result, StoreError};
use azure_core::credentials::Secret;
use azure_core::error::ErrorKind;
use azure_data_cosmos::clients::{ContainerClient, DatabaseClient};
use azure_data_cosmos::models::{
    ContainerProperties, IndexingPolicy, PartitionKeyDefinition, PartitionKeyKind,
    ThroughputProperties,
};
use azure_data_cosmos::{CosmosClient, CosmosClientOptions, CreateContainerOptions, PartitionKey};
use futures::stream::StreamExt;
use serde_json::Value;
use std::borrow::Cow;

/// Cosmos DB client
///
/// Holds one account client and the client for the configured database.
pub struct CosmosDbClient {
    client: CosmosClient,
    database: DatabaseClient,
    database_name: String,
    endpoint: String,
}

impl CosmosDbClient {
    /// Create a new Cosmos DB client
    ///
    /// No request is sent; the first network call happens on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the SDK rejects the endpoint or key.
    pub fn new(config: &CosmosDbConfig) -> Result<Self> {
        use secrecy::ExposeSecret;

        let key = Secret::new(config.key.expose_secret().as_str().to_string());
        let options = Some(CosmosClientOptions::default());

        let client = CosmosClient::with_key(&config.endpoint, key, options).map_err(|e| {
            StoreError::ConnectionFailed(format!("Failed to create Cosmos client: {e}"))
        })?;

        let database = client.database_client(&config.database_name);

        Ok(Self {
            client,
            database,
            database_name: config.database_name.clone(),
            endpoint: config.endpoint.clone(),
        })
    }

    /// List the ids of all databases in the account
    pub async fn list_databases(&self) -> Result<Vec<String>> {
        let mut pager = self
            .client
            .query_databases("SELECT * FROM root", None)
            .map_err(|e| classify_error("Failed to list databases", &e))?;

        let mut names = Vec::new();
        while let Some(item) = pager.next().await {
            let database = item.map_err(|e| classify_error("Failed to list databases", &e))?;
            names.push(database.id);
        }
        Ok(names)
    }

    /// Read container properties, `None` if it does not exist
    pub async fn read_container(&self, name: &str) -> Result<Option<ContainerInfo>> {
        let container = self.database.container_client(name);

        match container.read(None).await {
            Ok(response) => {
                let properties = response.into_body().map_err(|e| {
                    StoreError::DeserializationFailed(format!(
                        "Failed to read properties of container {name}: {e}"
                    ))
                })?;
                Ok(Some(ContainerInfo {
                    name: name.to_string(),
                    partition_key_path: properties.partition_key.paths.first().cloned(),
                }))
            }
            Err(e) => match classify_error("Failed to read container", &e) {
                StoreError::ContainerNotFound(_) => Ok(None),
                other => Err(other.into()),
            },
        }
    }

    /// Create a container with a hash partition key and manual throughput
    pub async fn create_container(&self, spec: &ContainerSpec) -> Result<()> {
        let partition_key_def = PartitionKeyDefinition {
            paths: vec![spec.partition_key_path()],
            kind: PartitionKeyKind::Hash,
            version: None,
        };

        let properties = ContainerProperties {
            id: Cow::Owned(spec.name.clone()),
            partition_key: partition_key_def,
            indexing_policy: Some(IndexingPolicy::default()),
            ..Default::default()
        };

        let options = CreateContainerOptions {
            throughput: Some(ThroughputProperties::manual(spec.throughput)),
            ..Default::default()
        };

        self.database
            .create_container(properties, Some(options))
            .await
            .map_err(|e| {
                match classify_error(&format!("Failed to create container {}", spec.name), &e) {
                    StoreError::Conflict(m) => StoreError::Conflict(m),
                    StoreError::WriteFailed(m) | StoreError::InvalidDocument(m) => {
                        StoreError::ContainerCreationFailed(m)
                    }
                    other => other,
                }
            })?;

        Ok(())
    }

    /// Upsert one document
    pub async fn upsert_item(
        &self,
        container: &str,
        partition: &PartitionValue,
        record: &Record,
    ) -> Result<()> {
        self.container_client(container)
            .upsert_item(to_partition_key(partition), record, None)
            .await
            .map_err(|e| {
                classify_error(
                    &format!("Failed to upsert document {}", record.id().unwrap_or("?")),
                    &e,
                )
            })?;
        Ok(())
    }

    /// Run a cross-partition query and collect every page
    pub async fn query_items(&self, container: &str, query: &str) -> Result<Vec<Value>> {
        let mut pager = self
            .container_client(container)
            .query_items::<Value>(query.to_string(), (), None)
            .map_err(|e| query_error(&e))?;

        let mut documents = Vec::new();
        while let Some(item) = pager.next().await {
            documents.push(item.map_err(|e| query_error(&e))?);
        }
        Ok(documents)
    }

    /// Get a container client
    pub fn container_client(&self, name: &str) -> ContainerClient {
        self.database.container_client(name)
    }

    /// Get the database name
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn to_partition_key(value: &PartitionValue) -> PartitionKey {
    match value {
        PartitionValue::Str(s) => PartitionKey::from(s.clone()),
        PartitionValue::Int(i) => PartitionKey::from(*i),
        PartitionValue::Float(x) => PartitionKey::from(*x),
    }
}

/// Rejected queries surface verbatim; transient failures stay store errors
fn query_error(e: &azure_core::Error) -> CosmosCsvError {
    match classify_error("Query failed", e) {
        StoreError::InvalidDocument(message) => CosmosCsvError::Query(message),
        other if other.is_transient() => other.into(),
        other => CosmosCsvError::Query(other.to_string()),
    }
}

/// Map an SDK error onto a [`StoreError`]
///
/// The HTTP status decides when there is one. Transport failures surface
/// as `ErrorKind::Io`. Only errors carrying neither fall back to the text.
fn classify_error(context: &str, e: &azure_core::Error) -> StoreError {
    let message = format!("{context}: {e}");

    if let Some(status) = e.http_status() {
        return StoreError::from_status(u16::from(status), message);
    }

    match e.kind() {
        ErrorKind::Io => StoreError::ConnectionFailed(message),
        ErrorKind::Credential => StoreError::AuthenticationFailed(message),
        ErrorKind::DataConversion => StoreError::DeserializationFailed(message),
        _ => {
            let text = e.to_string().to_ascii_lowercase();
            if text.contains("timed out") {
                StoreError::Timeout(message)
            } else if text.contains("connect") {
                StoreError::ConnectionFailed(message)
            } else {
                StoreError::WriteFailed(message)
            }
        }
    }
}
