//! In-memory document store
//!
//! Backs dry runs and tests. It keeps Cosmos DB's write semantics that the
//! pipeline depends on: documents are unique per (partition value, id),
//! upserts fully replace, writes to a missing container fail, and creating an
//! existing container is a conflict. Queries support `SELECT * FROM <alias>`
//! with an optional single `WHERE <alias>.<field> = <literal>` filter.

use crate::adapters::database::traits::{ContainerInfo, DocumentStore};
use crate::domain::{ContainerSpec, CosmosCsvError, PartitionValue, Record, Result, StoreError};
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
struct MemoryContainer {
    partition_key_path: String,
    throughput: usize,
    documents: Vec<StoredDocument>,
}

#[derive(Debug)]
struct StoredDocument {
    partition: String,
    id: String,
    body: Value,
}

/// Document store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    database: String,
    containers: Mutex<BTreeMap<String, MemoryContainer>>,
    pending_failures: Mutex<VecDeque<StoreError>>,
    create_calls: AtomicUsize,
    upsert_calls: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store for `database`
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Default::default()
        }
    }

    /// Make the next upsert calls fail with the given errors, in order
    pub fn fail_next_upserts(&self, errors: impl IntoIterator<Item = StoreError>) {
        self.failures().extend(errors);
    }

    /// Number of successful container creations
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Number of upsert attempts, failed ones included
    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    /// Number of documents stored in a container
    pub fn document_count(&self, container: &str) -> usize {
        self.lock()
            .get(container)
            .map_or(0, |c| c.documents.len())
    }

    /// Provisioned throughput of a container
    pub fn throughput(&self, container: &str) -> Option<usize> {
        self.lock().get(container).map(|c| c.throughput)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, MemoryContainer>> {
        // A poisoned lock only means a test panicked mid-write
        self.containers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn failures(&self) -> MutexGuard<'_, VecDeque<StoreError>> {
        self.pending_failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_databases(&self) -> Result<Vec<String>> {
        Ok(vec![self.database.clone()])
    }

    async fn read_container(&self, name: &str) -> Result<Option<ContainerInfo>> {
        Ok(self.lock().get(name).map(|c| ContainerInfo {
            name: name.to_string(),
            partition_key_path: Some(c.partition_key_path.clone()),
        }))
    }

    async fn create_container(&self, spec: &ContainerSpec) -> Result<()> {
        let mut containers = self.lock();
        if containers.contains_key(&spec.name) {
            return Err(StoreError::Conflict(format!(
                "container '{}' already exists",
                spec.name
            ))
            .into());
        }

        containers.insert(
            spec.name.clone(),
            MemoryContainer {
                partition_key_path: spec.partition_key_path(),
                throughput: spec.throughput,
                documents: Vec::new(),
            },
        );
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn upsert_item(
        &self,
        container: &str,
        partition: &PartitionValue,
        record: &Record,
    ) -> Result<()> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.failures().pop_front() {
            return Err(err.into());
        }

        let mut containers = self.lock();
        let target = containers
            .get_mut(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;

        let id = record
            .id()
            .ok_or_else(|| StoreError::InvalidDocument("document has no string 'id'".into()))?
            .to_string();

        let attribute = crate::domain::record::attribute_from_path(&target.partition_key_path);
        let stored_value = record
            .partition_value(attribute)
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;
        if &stored_value != partition {
            return Err(StoreError::InvalidDocument(format!(
                "partition key {partition} does not match document value {stored_value}"
            ))
            .into());
        }

        let partition = partition.to_string();
        let body = record.clone().into_value();
        match target
            .documents
            .iter_mut()
            .find(|d| d.partition == partition && d.id == id)
        {
            Some(existing) => existing.body = body,
            None => target.documents.push(StoredDocument {
                partition,
                id,
                body,
            }),
        }
        Ok(())
    }

    async fn query_items(&self, container: &str, query: &str) -> Result<Vec<Value>> {
        let filter = parse_query(query)?;
        let containers = self.lock();
        let target = containers
            .get(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;

        Ok(target
            .documents
            .iter()
            .filter(|d| match &filter {
                Some((field, literal)) => equals_literal(d.body.get(field), literal),
                None => true,
            })
            .map(|d| d.body.clone())
            .collect())
    }

    fn database_name(&self) -> &str {
        &self.database
    }
}

const QUERY_PATTERN: &str = r"(?i)^\s*SELECT\s+\*\s+FROM\s+(\w+)(?:\s+WHERE\s+(\w+)\.(\w+)\s*=\s*('(?:[^']|'')*'|-?\d+(?:\.\d+)?|true|false))?\s*;?\s*$";

/// Returns the optional `(field, literal)` equality filter
fn parse_query(query: &str) -> Result<Option<(String, Value)>> {
    let pattern = Regex::new(QUERY_PATTERN).map_err(|e| CosmosCsvError::Query(e.to_string()))?;
    let caps = pattern.captures(query).ok_or_else(|| {
        CosmosCsvError::Query(format!("unsupported query for in-memory store: {query}"))
    })?;

    let (Some(alias), Some(field), Some(literal)) = (caps.get(2), caps.get(3), caps.get(4))
    else {
        return Ok(None);
    };

    if !alias.as_str().eq_ignore_ascii_case(&caps[1]) {
        return Err(CosmosCsvError::Query(format!(
            "unknown alias '{}' in query: {query}",
            alias.as_str()
        )));
    }

    let literal = literal.as_str();
    let quoted = literal.strip_prefix('\'').and_then(|l| l.strip_suffix('\''));
    let value = if let Some(quoted) = quoted {
        Value::String(quoted.replace("''", "'"))
    } else {
        serde_json::from_str(&literal.to_lowercase())?
    };
    Ok(Some((field.as_str().to_string(), value)))
}

/// Numbers compare by value, so `10` matches a stored `10.0`
fn equals_literal(value: Option<&Value>, literal: &Value) -> bool {
    match (value, literal) {
        (Some(Value::Number(a)), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Some(value), literal) => value == literal,
        (None, _) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, customer: &str) -> Record {
        let mut r = Record::new();
        r.insert("customer", json!(customer));
        r.set_id(id);
        r
    }

    fn spec() -> ContainerSpec {
        ContainerSpec::new("orders", "customer", 400)
    }

    #[tokio::test]
    async fn test_create_twice_conflicts() {
        let store = MemoryStore::new("db");
        store.create_container(&spec()).await.unwrap();
        let err = store.create_container(&spec()).await.unwrap_err();
        assert!(matches!(err, CosmosCsvError::Store(StoreError::Conflict(_))));
        assert_eq!(store.create_calls(), 1);
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let store = MemoryStore::new("db");
        store.create_container(&spec()).await.unwrap();
        let alice = PartitionValue::Str("Alice".into());

        store.upsert_item("orders", &alice, &record("0", "Alice")).await.unwrap();
        let mut updated = record("0", "Alice");
        updated.insert("amount", json!(12));
        store.upsert_item("orders", &alice, &updated).await.unwrap();

        assert_eq!(store.document_count("orders"), 1);
        let docs = store.query_items("orders", "SELECT * FROM c").await.unwrap();
        assert_eq!(docs[0]["amount"], json!(12));
    }

    #[tokio::test]
    async fn test_upsert_missing_container() {
        let store = MemoryStore::new("db");
        let err = store
            .upsert_item("nope", &PartitionValue::Int(1), &record("0", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, CosmosCsvError::Store(StoreError::ContainerNotFound(_))));
    }

    #[tokio::test]
    async fn test_upsert_partition_mismatch() {
        let store = MemoryStore::new("db");
        store.create_container(&spec()).await.unwrap();
        let err = store
            .upsert_item("orders", &PartitionValue::Str("Bob".into()), &record("0", "Alice"))
            .await
            .unwrap_err();
        assert!(matches!(err, CosmosCsvError::Store(StoreError::InvalidDocument(_))));
    }

    #[tokio::test]
    async fn test_injected_failures_are_consumed_in_order() {
        let store = MemoryStore::new("db");
        store.create_container(&spec()).await.unwrap();
        store.fail_next_upserts([StoreError::Throttled("slow down".into())]);
        let alice = PartitionValue::Str("Alice".into());

        assert!(store.upsert_item("orders", &alice, &record("0", "Alice")).await.is_err());
        assert!(store.upsert_item("orders", &alice, &record("0", "Alice")).await.is_ok());
        assert_eq!(store.upsert_calls(), 2);
    }

    #[tokio::test]
    async fn test_query_with_filter() {
        let store = MemoryStore::new("db");
        store.create_container(&spec()).await.unwrap();
        for (id, name) in [("0", "Alice"), ("1", "Bob"), ("2", "O'Neil")] {
            store
                .upsert_item("orders", &PartitionValue::Str(name.into()), &record(id, name))
                .await
                .unwrap();
        }

        let bob = store
            .query_items("orders", "SELECT * FROM c WHERE c.customer = 'Bob'")
            .await
            .unwrap();
        assert_eq!(bob.len(), 1);
        assert_eq!(bob[0]["id"], json!("1"));

        let quoted = store
            .query_items("orders", "select * from c where c.customer = 'O''Neil'")
            .await
            .unwrap();
        assert_eq!(quoted.len(), 1);
    }

    #[tokio::test]
    async fn test_numeric_filter_matches_by_value() {
        let store = MemoryStore::new("db");
        store.create_container(&spec()).await.unwrap();
        let mut alice = record("0", "Alice");
        alice.insert("amount", json!(10.0));
        store
            .upsert_item("orders", &PartitionValue::Str("Alice".into()), &alice)
            .await
            .unwrap();

        for query in [
            "SELECT * FROM c WHERE c.amount = 10",
            "SELECT * FROM c WHERE c.amount = 10.0",
        ] {
            assert_eq!(store.query_items("orders", query).await.unwrap().len(), 1, "{query}");
        }
        let none = store
            .query_items("orders", "SELECT * FROM c WHERE c.amount = 11")
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_query() {
        let store = MemoryStore::new("db");
        store.create_container(&spec()).await.unwrap();
        let err = store
            .query_items("orders", "SELECT VALUE COUNT(1) FROM c")
            .await
            .unwrap_err();
        assert!(matches!(err, CosmosCsvError::Query(_)));
    }

    #[test]
    fn test_parse_numeric_literal() {
        let (field, value) = parse_query("SELECT * FROM c WHERE c.amount = 10.5")
            .unwrap()
            .unwrap();
        assert_eq!(field, "amount");
        assert_eq!(value, json!(10.5));
    }
}
