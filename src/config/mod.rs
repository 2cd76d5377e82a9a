//! Configuration management
//!
//! Configuration is built once at process start and passed by reference to
//! every component that needs it. Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file (`--config`), with `${VAR}` substitution
//! 3. Environment variables (optionally loaded from `.env`)
//!
//! The three connection settings are required:
//!
//! ```bash
//! export DB_URL="https://your-account.documents.azure.com:443/"
//! export DB_SECRET="<primary key>"
//! export DB_NAME="imports"
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [cosmosdb]
//! endpoint = "https://your-account.documents.azure.com:443/"
//! key = "${DB_SECRET}"
//! database_name = "imports"
//!
//! [import]
//! data_dir = "./data"
//! extensions = ["csv"]
//! throughput = 400
//! failure_policy = "continue"
//! id_strategy = "positional"
//!
//! [retry]
//! max_retries = 3
//!
//! [logging]
//! level = "info"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_with};
pub use schema::{AppConfig, CosmosDbConfig, ImportConfig, LoggingConfig, RetryConfig};
pub use secret::{secret_key, AccessKey, SecretKey};
