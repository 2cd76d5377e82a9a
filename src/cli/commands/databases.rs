//! `databases` command - lists every database in the account

use super::{connect, report_failure, EXIT_SUCCESS};
use crate::adapters::database::StoreMode;
use crate::config::AppConfig;
use crate::core::query::QueryFacade;
use clap::Args;

/// Arguments for the databases command
#[derive(Args, Debug, Default)]
pub struct DatabasesArgs {}

impl DatabasesArgs {
    /// Execute the databases command
    pub async fn execute(&self, config: &AppConfig) -> anyhow::Result<i32> {
        let store = match connect(config, StoreMode::Service).await {
            Ok(store) => store,
            Err(code) => return Ok(code),
        };

        let facade = QueryFacade::new(store);
        match facade.list_databases().await {
            Ok(names) => {
                tracing::info!(count = names.len(), "Listed databases");
                for name in names {
                    println!("{name}");
                }
                Ok(EXIT_SUCCESS)
            }
            Err(e) => Ok(report_failure("Listing databases", &e)),
        }
    }
}
