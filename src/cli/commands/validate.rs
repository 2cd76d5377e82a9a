//! Validate config command implementation
//!
//! Loading already validated the configuration by the time this runs; the
//! command prints what was resolved, with the access key redacted.

use super::EXIT_SUCCESS;
use crate::config::AppConfig;
use clap::Args;
use secrecy::ExposeSecret;
use std::io::{self, Write};
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(
        &self,
        config_path: Option<&Path>,
        config: &AppConfig,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = ?config_path, "Validating configuration");

        let mut out = io::stdout().lock();
        render_config(config_path, config, &mut out)?;
        out.flush()?;
        Ok(EXIT_SUCCESS)
    }
}

/// Print the resolved configuration
pub fn render_config<W: Write>(
    config_path: Option<&Path>,
    config: &AppConfig,
    out: &mut W,
) -> io::Result<()> {
    match config_path {
        Some(path) => writeln!(out, "🔍 Configuration file: {}", path.display())?,
        None => writeln!(out, "🔍 Configuration from environment only")?,
    }
    writeln!(out, "✅ Configuration is valid")?;
    writeln!(out)?;
    writeln!(out, "Configuration Summary:")?;
    writeln!(out, "  Cosmos DB Endpoint: {}", config.cosmosdb.endpoint)?;
    writeln!(
        out,
        "  Cosmos DB Key: {}",
        redact(config.cosmosdb.key.expose_secret().as_str())
    )?;
    writeln!(out, "  Cosmos DB Database: {}", config.cosmosdb.database_name)?;
    writeln!(out, "  Data Directory: {}", config.import.data_dir.display())?;
    writeln!(
        out,
        "  Extensions: {}",
        if config.import.extensions.is_empty() {
            "all files".to_string()
        } else {
            config.import.extensions.join(", ")
        }
    )?;
    writeln!(out, "  Throughput: {} RU/s", config.import.throughput)?;
    writeln!(out, "  Failure Policy: {}", config.import.failure_policy)?;
    writeln!(out, "  Id Strategy: {}", config.import.id_strategy)?;
    writeln!(out, "  Dry Run: {}", config.import.dry_run)?;
    writeln!(out, "  Max Retries: {}", config.retry.max_retries)?;
    writeln!(out, "  Log Level: {}", config.logging.level)?;
    if config.logging.local_enabled {
        writeln!(
            out,
            "  Log Files: {} ({})",
            config.logging.local_path, config.logging.local_rotation
        )?;
    }
    writeln!(out)
}

fn redact(secret: &str) -> String {
    if secret.is_empty() {
        "(not set)".to_string()
    } else {
        format!("******** ({} chars)", secret.chars().count())
    }
}
