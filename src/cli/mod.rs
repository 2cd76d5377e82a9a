//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for cosmos-csv using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cosmos-csv - import CSV files into Azure Cosmos DB
#[derive(Parser, Debug)]
#[command(name = "cosmos-csv")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Optional TOML configuration file; the environment always applies on top
    #[arg(short, long, env = "COSMOS_CSV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import every CSV file under the data directory
    Import(commands::import::ImportArgs),

    /// List the databases in the account
    Databases(commands::databases::DatabasesArgs),

    /// Run a query against a container
    Query(commands::query::QueryArgs),

    /// Upsert one JSON document into a container
    Upsert(commands::upsert::UpsertArgs),

    /// Validate the configuration and print a summary
    ValidateConfig(commands::validate::ValidateArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mapper::IdStrategy;

    #[test]
    fn test_cli_parse_import_without_arguments() {
        let cli = Cli::parse_from(["cosmos-csv", "import"]);
        match cli.command {
            Commands::Import(args) => {
                assert!(args.data_dir.is_none());
                assert!(!args.dry_run);
                assert!(!args.abort_on_error);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_import_flags() {
        let cli = Cli::parse_from([
            "cosmos-csv",
            "import",
            "--data-dir",
            "/srv/csv",
            "--dry-run",
            "--abort-on-error",
            "--id-strategy",
            "column:order_no",
        ]);
        let Commands::Import(args) = cli.command else {
            panic!("expected import");
        };
        assert_eq!(args.data_dir, Some(PathBuf::from("/srv/csv")));
        assert!(args.dry_run);
        assert!(args.abort_on_error);
        assert_eq!(args.id_strategy, Some(IdStrategy::Column("order_no".into())));
    }

    #[test]
    fn test_cli_rejects_bad_id_strategy() {
        assert!(Cli::try_parse_from(["cosmos-csv", "import", "--id-strategy", "random"]).is_err());
    }

    #[test]
    fn test_cli_parse_with_config_and_log_level() {
        let cli = Cli::parse_from([
            "cosmos-csv",
            "--config",
            "custom.toml",
            "--log-level",
            "debug",
            "databases",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::Databases(_)));
    }

    #[test]
    fn test_cli_parse_query() {
        let cli = Cli::parse_from([
            "cosmos-csv",
            "query",
            "--container",
            "orders",
            "--query",
            "SELECT * FROM c",
        ]);
        let Commands::Query(args) = cli.command else {
            panic!("expected query");
        };
        assert_eq!(args.container, "orders");
        assert_eq!(args.query, "SELECT * FROM c");
    }

    #[test]
    fn test_cli_query_requires_container() {
        let args = ["cosmos-csv", "query", "--query", "SELECT * FROM c"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_parse_upsert() {
        let cli = Cli::parse_from([
            "cosmos-csv",
            "upsert",
            "--container",
            "orders",
            "--document",
            r#"{"id":"1"}"#,
        ]);
        assert!(matches!(cli.command, Commands::Upsert(_)));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["cosmos-csv", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }
}
