//! `query` command - runs a SQL query against one container
//!
//! Results are printed to stdout as JSON, one document per line unless
//! `--pretty` is given.

use super::{connect, report_failure, EXIT_SUCCESS};
use crate::adapters::database::StoreMode;
use crate::config::AppConfig;
use crate::core::query::QueryFacade;
use clap::Args;
use serde_json::Value;
use std::io::{self, Write};

/// Arguments for the query command
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Container to query
    #[arg(long)]
    pub container: String,

    /// Query text, e.g. "SELECT * FROM c WHERE c.customer = 'Alice'"
    #[arg(short, long)]
    pub query: String,

    /// Print the results as one indented JSON array
    #[arg(long)]
    pub pretty: bool,
}

impl QueryArgs {
    /// Execute the query command
    pub async fn execute(&self, config: &AppConfig) -> anyhow::Result<i32> {
        let store = match connect(config, StoreMode::Service).await {
            Ok(store) => store,
            Err(code) => return Ok(code),
        };

        let facade = QueryFacade::new(store);
        let documents = match facade.query(&self.container, &self.query).await {
            Ok(documents) => documents,
            Err(e) => return Ok(report_failure("Query", &e)),
        };

        let mut out = io::stdout().lock();
        write_documents(&documents, self.pretty, &mut out)?;
        out.flush()?;
        Ok(EXIT_SUCCESS)
    }
}

/// Write documents as JSON lines, or as a pretty array
pub fn write_documents<W: Write>(
    documents: &[Value],
    pretty: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, documents)?;
        writeln!(out)?;
    } else {
        for document in documents {
            serde_json::to_writer(&mut *out, document)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
