//! # cosmos-csv - CSV files into Azure Cosmos DB
//!
//! cosmos-csv imports a directory of CSV files into an Azure Cosmos DB
//! database, one container per file, and offers a small query surface over
//! the same database.
//!
//! ## Overview
//!
//! - **Locating** input files recursively, in a stable order
//! - **Mapping** rows to JSON documents with typed cells and a string `id`
//! - **Loading** documents with per-record upserts, retries and a failure policy
//! - **Querying** containers and upserting single documents
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Locator, mapper, import pipeline and query façade
//! - [`adapters`] - Document stores (Cosmos DB, in-memory)
//! - [`domain`] - Records, container specs and errors
//! - [`config`] - Configuration loading and validation
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cosmos_csv::adapters::database::{create_document_store, StoreMode};
//! use cosmos_csv::config::load_config;
//! use cosmos_csv::core::import::{ImportCoordinator, SilentObserver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // DB_URL, DB_SECRET and DB_NAME come from the environment
//!     let config = load_config(None)?;
//!     let store = create_document_store(&config, StoreMode::for_import(&config.import)).await?;
//!
//!     let summary = ImportCoordinator::new(&config, store)
//!         .run(&mut SilentObserver)
//!         .await?;
//!
//!     println!("Imported {} of {} records", summary.succeeded(), summary.total_records());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`], whose error type is
//! [`domain::CosmosCsvError`]. Store failures carry a
//! [`domain::StoreError`] that tells transient failures apart from permanent
//! ones.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
