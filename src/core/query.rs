//! Query façade
//!
//! Small read/write surface over the selected database for ad-hoc use:
//! list databases, run a query against a container, and upsert a single
//! document. Queries are passed to the store verbatim.

use crate::adapters::database::DocumentStore;
use crate::domain::record::attribute_from_path;
use crate::domain::{CosmosCsvError, Record, Result, StoreError};
use serde_json::Value;
use std::sync::Arc;

/// Ad-hoc operations against one database
pub struct QueryFacade {
    store: Arc<dyn DocumentStore>,
}

impl QueryFacade {
    /// Create a façade over `store`
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Name of the selected database
    pub fn database_name(&self) -> &str {
        self.store.database_name()
    }

    /// Every database visible to the credential
    pub async fn list_databases(&self) -> Result<Vec<String>> {
        self.store.list_databases().await
    }

    /// Run `query` against `container` and return every matching document
    ///
    /// # Errors
    ///
    /// Returns [`CosmosCsvError::Query`] when the store rejects the query text.
    pub async fn query(&self, container: &str, query: &str) -> Result<Vec<Value>> {
        tracing::debug!(container, query, "Running query");
        let documents = self.store.query_items(container, query).await?;
        tracing::debug!(container, count = documents.len(), "Query returned");
        Ok(documents)
    }

    /// Upsert one document into an existing container
    ///
    /// The partition value is read from the document using the container's
    /// own partition key path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ContainerNotFound`] if the container does not
    /// exist, or a validation error if the document lacks an `id` or a usable
    /// partition value.
    pub async fn upsert(&self, container: &str, document: Value) -> Result<()> {
        let record = Record::try_from(document)?;

        let info = self
            .store
            .read_container(container)
            .await?
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;

        let path = info.partition_key_path.ok_or_else(|| {
            CosmosCsvError::Validation(format!("container '{container}' has no partition key"))
        })?;

        let partition = record.validate_for(attribute_from_path(&path))?;
        self.store.upsert_item(container, &partition, &record).await?;

        tracing::info!(container, id = record.id().unwrap_or_default(), "Upserted document");
        Ok(())
    }
}
