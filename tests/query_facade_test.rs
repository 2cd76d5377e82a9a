//! Integration tests for the query façade after an import

use cosmos_csv::adapters::memory::MemoryStore;
use cosmos_csv::config::AppConfig;
use cosmos_csv::core::import::{ImportCoordinator, SilentObserver};
use cosmos_csv::core::query::QueryFacade;
use cosmos_csv::domain::{CosmosCsvError, StoreError};
use serde_json::json;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

async fn imported_orders() -> (TempDir, QueryFacade) {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("orders.csv"),
        "id,customer,amount\n5,Alice,10.0\n6,Bob,12.5\n",
    )
    .unwrap();

    let mut config = AppConfig::default();
    config.cosmosdb.database_name = "imports".to_string();
    config.import.data_dir = dir.path().to_path_buf();

    let store = Arc::new(MemoryStore::new("imports"));
    ImportCoordinator::new(&config, store.clone())
        .run(&mut SilentObserver)
        .await
        .unwrap();

    (dir, QueryFacade::new(store))
}

#[tokio::test]
async fn test_query_returns_imported_records() {
    let (_dir, facade) = imported_orders().await;

    let docs = facade.query("orders", "SELECT * FROM c").await.unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["customer"], json!("Alice"));
    assert_eq!(docs[1]["data_id"], json!("6"));
}

#[tokio::test]
async fn test_query_with_filter() {
    let (_dir, facade) = imported_orders().await;

    let docs = facade
        .query("orders", "SELECT * FROM c WHERE c.customer = 'Bob'")
        .await
        .unwrap();
    assert_eq!(
        docs,
        vec![json!({"data_id": "6", "customer": "Bob", "amount": 12.5, "id": "1"})]
    );
}

#[tokio::test]
async fn test_upsert_replaces_imported_document() {
    let (_dir, facade) = imported_orders().await;

    facade
        .upsert(
            "orders",
            json!({"data_id": "5", "customer": "Alice", "amount": 11.0, "id": "0"}),
        )
        .await
        .unwrap();

    let docs = facade
        .query("orders", "SELECT * FROM c WHERE c.id = '0'")
        .await
        .unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["amount"], json!(11.0));
}

#[tokio::test]
async fn test_upsert_into_missing_container() {
    let (_dir, facade) = imported_orders().await;

    let err = facade
        .upsert("invoices", json!({"id": "1"}))
        .await
        .unwrap_err();
    assert!(matches!(err, CosmosCsvError::Store(StoreError::ContainerNotFound(_))));
}

#[tokio::test]
async fn test_upsert_without_partition_value() {
    let (_dir, facade) = imported_orders().await;

    let err = facade
        .upsert("orders", json!({"customer": "Eve", "id": "9"}))
        .await
        .unwrap_err();
    assert!(matches!(err, CosmosCsvError::Validation(_)));
}

#[tokio::test]
async fn test_list_databases() {
    let (_dir, facade) = imported_orders().await;
    assert_eq!(facade.list_databases().await.unwrap(), vec!["imports".to_string()]);
}
