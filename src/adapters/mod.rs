//! External system integrations
//!
//! - [`database`] - Document store trait and factory
//! - [`cosmosdb`] - Azure Cosmos DB implementation
//! - [`memory`] - In-memory implementation for dry runs and tests
//!
//! # Example
//!
//! ```rust
//! use cosmos_csv::adapters::database::DocumentStore;
//! use cosmos_csv::adapters::memory::MemoryStore;
//! use cosmos_csv::domain::ContainerSpec;
//!
//! # async fn example() -> cosmos_csv::domain::Result<()> {
//! let store = MemoryStore::new("imports");
//! store.ensure_container(&ContainerSpec::new("orders", "data_id", 400)).await?;
//! assert_eq!(store.list_databases().await?, vec!["imports"]);
//! # Ok(())
//! # }
//! ```

pub mod cosmosdb;
pub mod database;
pub mod memory;
