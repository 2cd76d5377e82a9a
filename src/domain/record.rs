//! Records and container descriptors

use crate::domain::{CosmosCsvError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Reserved identifier field of the document store
pub const ID_FIELD: &str = "id";

/// Name a source `id` column is moved to
pub const RENAMED_ID_FIELD: &str = "data_id";

/// One document derived from one CSV row.
///
/// Field order is the insertion order, so documents keep the source column
/// order when serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Insert or replace a field
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Set the `id` field
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.0.insert(ID_FIELD.to_string(), Value::String(id.into()));
    }

    /// Get a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// The `id` field, when it is present and a string
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Field names in order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extract the partition key value stored under `attribute`
    ///
    /// # Errors
    ///
    /// Returns a validation error when the attribute is missing, null, or not
    /// a string or number.
    pub fn partition_value(&self, attribute: &str) -> Result<PartitionValue> {
        match self.0.get(attribute) {
            Some(value) => PartitionValue::try_from(value).map_err(|reason| {
                CosmosCsvError::Validation(format!(
                    "record {}: partition attribute '{attribute}' {reason}",
                    self.id().unwrap_or("<no id>")
                ))
            }),
            None => Err(CosmosCsvError::Validation(format!(
                "record {}: partition attribute '{attribute}' is missing",
                self.id().unwrap_or("<no id>")
            ))),
        }
    }

    /// Check that the record carries a string `id` and a usable partition value
    pub fn validate_for(&self, partition_attribute: &str) -> Result<PartitionValue> {
        if self.id().map_or(true, str::is_empty) {
            return Err(CosmosCsvError::Validation(
                "record has no string 'id' field".to_string(),
            ));
        }
        self.partition_value(partition_attribute)
    }

    /// Consume the record into a JSON document
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Record {
    type Error = CosmosCsvError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(CosmosCsvError::Validation(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }
}

/// Partition key value of a record
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionValue {
    /// String value
    Str(String),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
}

impl TryFrom<&Value> for PartitionValue {
    type Error = &'static str;

    fn try_from(value: &Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(PartitionValue::Str(s.clone())),
            Value::Number(n) => n
                .as_i64()
                .map(PartitionValue::Int)
                .or_else(|| n.as_f64().map(PartitionValue::Float))
                .ok_or("is not representable as a partition key"),
            Value::Null => Err("is null"),
            Value::Bool(_) => Err("is a boolean, which is not a supported partition key"),
            Value::Array(_) | Value::Object(_) => Err("is not a scalar"),
        }
    }
}

impl fmt::Display for PartitionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionValue::Str(s) => write!(f, "{s}"),
            PartitionValue::Int(i) => write!(f, "{i}"),
            PartitionValue::Float(x) => write!(f, "{x}"),
        }
    }
}

/// Destination container descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    /// Container name (source file stem)
    pub name: String,

    /// Field used as partition key
    pub partition_attribute: String,

    /// Provisioned throughput in RU/s
    pub throughput: usize,
}

impl ContainerSpec {
    /// Create a new container descriptor
    pub fn new(
        name: impl Into<String>,
        partition_attribute: impl Into<String>,
        throughput: usize,
    ) -> Self {
        Self {
            name: name.into(),
            partition_attribute: partition_attribute.into(),
            throughput,
        }
    }

    /// Partition key path, e.g. `/customer`
    pub fn partition_key_path(&self) -> String {
        format!("/{}", self.partition_attribute)
    }
}

/// Strip the leading `/` from a partition key path
pub fn attribute_from_path(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}
