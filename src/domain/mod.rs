//! Core domain types for cosmos-csv.
//!
//! This module contains the value types that flow through the import pipeline
//! and the query façade:
//!
//! - [`Record`] - One document derived from one CSV row
//! - [`ContainerSpec`] - Destination container descriptor
//! - [`PartitionValue`] - Typed partition key value of a record
//! - [`CosmosCsvError`] - Error hierarchy shared by every module
//!
//! # Example
//!
//! ```rust
//! use cosmos_csv::domain::{ContainerSpec, Record};
//! use serde_json::json;
//!
//! let mut record = Record::new();
//! record.insert("customer", json!("Alice"));
//! record.set_id("0");
//!
//! let spec = ContainerSpec::new("orders", "customer", 400);
//! assert_eq!(spec.partition_key_path(), "/customer");
//! assert_eq!(record.partition_value(&spec.partition_attribute).unwrap().to_string(), "Alice");
//! ```

pub mod errors;
pub mod record;
pub mod result;

pub use errors::{CosmosCsvError, ParseError, StoreError};
pub use record::{ContainerSpec, PartitionValue, Record, ID_FIELD, RENAMED_ID_FIELD};
pub use result::Result;
