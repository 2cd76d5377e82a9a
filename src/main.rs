use clap::Parser;
use cosmos_csv::cli::commands::{EXIT_CONFIG, EXIT_FATAL};
use cosmos_csv::cli::{Cli, Commands};
use cosmos_csv::config::{load_config, AppConfig, LoggingConfig};
use cosmos_csv::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let exit_code = run(&cli).await;
    process::exit(exit_code);
}

/// Load configuration, set up logging and dispatch; the logging guard is
/// dropped before the process exits so file logs are flushed.
async fn run(cli: &Cli) -> i32 {
    let loaded = load_config(cli.config.as_deref());

    let fallback = LoggingConfig::default();
    let logging_config = loaded.as_ref().map_or(&fallback, |c| &c.logging);
    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| logging_config.level.clone());

    let _guard = match init_logging(&log_level, logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return EXIT_CONFIG;
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "cosmos-csv - CSV to Azure Cosmos DB importer"
    );

    // Nothing touches the network until the configuration is known to be valid
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Configuration error");
            eprintln!("❌ {e}");
            return EXIT_CONFIG;
        }
    };

    match execute_command(cli, &config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, config: &AppConfig) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Import(args) => args.execute(config).await,
        Commands::Databases(args) => args.execute(config).await,
        Commands::Query(args) => args.execute(config).await,
        Commands::Upsert(args) => args.execute(config).await,
        Commands::ValidateConfig(args) => args.execute(cli.config.as_deref(), config).await,
    }
}
