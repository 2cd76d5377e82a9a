//! Core business logic for cosmos-csv.
//!
//! # Modules
//!
//! - [`locator`] - Recursive discovery of input files
//! - [`mapper`] - CSV parsing, column renaming, type inference and id assignment
//! - [`import`] - Container preparation, upserts with retries, and run summaries
//! - [`query`] - Ad-hoc listing, querying and single-document upserts
//!
//! # Import Workflow
//!
//! 1. **Locate**: walk the data directory in file-name order
//! 2. **Map**: turn each file into records, one container per file
//! 3. **Prepare**: create the container if it does not exist
//! 4. **Upsert**: write records one by one, retrying transient failures
//! 5. **Report**: summarize per file and per record
//!
//! # Example
//!
//! ```rust,no_run
//! use cosmos_csv::adapters::database::{create_document_store, StoreMode};
//! use cosmos_csv::config::load_config;
//! use cosmos_csv::core::import::{ImportCoordinator, SilentObserver};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config(None)?;
//! let store = create_document_store(&config, StoreMode::for_import(&config.import)).await?;
//!
//! let coordinator = ImportCoordinator::new(&config, store);
//! let summary = coordinator.run(&mut SilentObserver).await?;
//!
//! println!("Stored: {}", summary.succeeded());
//! println!("Failed: {}", summary.failed());
//! # Ok(())
//! # }
//! ```

pub mod import;
pub mod locator;
pub mod mapper;
pub mod query;
