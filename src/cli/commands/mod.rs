//! CLI command implementations
//!
//! Commands receive the already-loaded configuration and return the process
//! exit code.

pub mod databases;
pub mod import;
pub mod query;
pub mod upsert;
pub mod validate;

use crate::adapters::database::{create_document_store, DocumentStore, StoreMode};
use crate::config::AppConfig;
use crate::domain::{CosmosCsvError, StoreError};
use std::sync::Arc;

/// Everything worked
pub const EXIT_SUCCESS: i32 = 0;
/// Some records or files failed, or the operation was rejected
pub const EXIT_PARTIAL: i32 = 1;
/// Configuration missing or invalid
pub const EXIT_CONFIG: i32 = 2;
/// The database could not be reached or rejected the credential
pub const EXIT_CONNECTION: i32 = 4;
/// Anything else
pub const EXIT_FATAL: i32 = 5;

/// Exit code for an error that ends a command
pub fn exit_code_for(error: &CosmosCsvError) -> i32 {
    match error {
        CosmosCsvError::Configuration(_) => EXIT_CONFIG,
        CosmosCsvError::Store(
            StoreError::ConnectionFailed(_)
            | StoreError::AuthenticationFailed(_)
            | StoreError::Timeout(_)
            | StoreError::Throttled(_),
        ) => EXIT_CONNECTION,
        CosmosCsvError::Store(_) | CosmosCsvError::Query(_) | CosmosCsvError::Validation(_) => {
            EXIT_PARTIAL
        }
        CosmosCsvError::Parse(_) | CosmosCsvError::Io(_) | CosmosCsvError::Serialization(_) => {
            EXIT_FATAL
        }
    }
}

/// Create the store for `mode`, printing the failure
pub(crate) async fn connect(
    config: &AppConfig,
    mode: StoreMode,
) -> Result<Arc<dyn DocumentStore>, i32> {
    create_document_store(config, mode).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to create document store");
        eprintln!("❌ Failed to connect to Cosmos DB: {e}");
        EXIT_CONNECTION
    })
}

/// Print a command failure and map it to an exit code
pub(crate) fn report_failure(action: &str, error: &CosmosCsvError) -> i32 {
    crate::log_error_with_context!(error, action);
    eprintln!("❌ {action} failed: {error}");
    exit_code_for(error)
}
