//! Document store factory

use crate::adapters::cosmosdb::{CosmosDbAdapter, CosmosDbClient};
use crate::adapters::database::traits::DocumentStore;
use crate::adapters::memory::MemoryStore;
use crate::config::{AppConfig, ImportConfig};
use crate::domain::Result;
use std::sync::Arc;

/// Which backend a command talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    /// The configured Cosmos DB account
    Service,
    /// An in-memory store; nothing reaches the service
    DryRun,
}

impl StoreMode {
    /// Mode for an import run
    ///
    /// Only imports honour `dry_run`; the query commands always use the
    /// service.
    pub fn for_import(config: &ImportConfig) -> Self {
        if config.dry_run {
            StoreMode::DryRun
        } else {
            StoreMode::Service
        }
    }
}

/// Create a document store for `mode`
///
/// # Errors
///
/// Returns an error if the Cosmos DB client cannot be created.
pub async fn create_document_store(
    config: &AppConfig,
    mode: StoreMode,
) -> Result<Arc<dyn DocumentStore>> {
    if mode == StoreMode::DryRun {
        tracing::info!("Using in-memory store for dry run");
        return Ok(Arc::new(MemoryStore::new(&config.cosmosdb.database_name)));
    }

    tracing::info!(endpoint = %config.cosmosdb.endpoint, "Creating Cosmos DB client");
    let client = CosmosDbClient::new(&config.cosmosdb)?;
    Ok(Arc::new(CosmosDbAdapter::new(client)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_key;

    fn config(endpoint: &str, dry_run: bool) -> AppConfig {
        let mut config = AppConfig::default();
        config.cosmosdb.endpoint = endpoint.to_string();
        config.cosmosdb.key = secret_key("dGVzdC1rZXk=".to_string());
        config.cosmosdb.database_name = "imports".to_string();
        config.import.dry_run = dry_run;
        config
    }

    #[test]
    fn test_mode_for_import() {
        assert_eq!(
            StoreMode::for_import(&config("", true).import),
            StoreMode::DryRun
        );
        assert_eq!(
            StoreMode::for_import(&config("", false).import),
            StoreMode::Service
        );
    }

    #[tokio::test]
    async fn test_dry_run_store_is_in_memory() {
        let store = create_document_store(&config("not a url", true), StoreMode::DryRun)
            .await
            .unwrap();
        assert_eq!(store.list_databases().await.unwrap(), vec!["imports"]);
    }

    #[tokio::test]
    async fn test_service_mode_ignores_dry_run_setting() {
        // An unparsable endpoint proves the Cosmos client was built
        let result = create_document_store(&config("not a url", true), StoreMode::Service).await;
        assert!(result.is_err());
    }
}
