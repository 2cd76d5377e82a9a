//! `upsert` command - writes one JSON document into an existing container

use super::{connect, report_failure, EXIT_PARTIAL, EXIT_SUCCESS};
use crate::adapters::database::StoreMode;
use crate::config::AppConfig;
use crate::core::query::QueryFacade;
use anyhow::Context;
use clap::Args;
use serde_json::Value;
use std::fs;

/// Arguments for the upsert command
#[derive(Args, Debug)]
pub struct UpsertArgs {
    /// Target container; it must already exist
    #[arg(long)]
    pub container: String,

    /// JSON document, or @path to read it from a file
    #[arg(long, value_name = "JSON|@FILE")]
    pub document: String,
}

impl UpsertArgs {
    /// Execute the upsert command
    pub async fn execute(&self, config: &AppConfig) -> anyhow::Result<i32> {
        let document = match self.read_document() {
            Ok(document) => document,
            Err(e) => {
                tracing::error!(error = %e, "Invalid document argument");
                eprintln!("❌ Invalid document: {e:#}");
                return Ok(EXIT_PARTIAL);
            }
        };

        let store = match connect(config, StoreMode::Service).await {
            Ok(store) => store,
            Err(code) => return Ok(code),
        };

        match QueryFacade::new(store).upsert(&self.container, document).await {
            Ok(()) => {
                println!("✅ Document upserted into '{}'", self.container);
                Ok(EXIT_SUCCESS)
            }
            Err(e) => Ok(report_failure("Upsert", &e)),
        }
    }

    fn read_document(&self) -> anyhow::Result<Value> {
        let text = match self.document.strip_prefix('@') {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read document file {path}"))?,
            None => self.document.clone(),
        };
        serde_json::from_str(&text).context("document is not valid JSON")
    }
}
