//! Azure Cosmos DB integration
//!
//! [`CosmosDbClient`] wraps the SDK; [`CosmosDbAdapter`] exposes it as a
//! [`DocumentStore`](crate::adapters::database::DocumentStore).

pub mod adapter;
pub mod client;

pub use adapter::CosmosDbAdapter;
pub use client::CosmosDbClient;
