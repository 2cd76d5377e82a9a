//! Configuration schema types

use crate::config::secret::{secret_key, SecretKey};
use crate::core::import::FailurePolicy;
use crate::core::mapper::IdStrategy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Smallest manual throughput Cosmos DB accepts for a container
pub const MIN_THROUGHPUT: usize = 400;

/// Upper bound accepted by validation
pub const MAX_THROUGHPUT: usize = 1_000_000;

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Cosmos DB connection settings
    #[serde(default)]
    pub cosmosdb: CosmosDbConfig,

    /// Import pipeline settings
    #[serde(default)]
    pub import: ImportConfig,

    /// Retry settings for transient store failures
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        self.cosmosdb.validate()?;
        self.import.validate()?;
        self.retry.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Cosmos DB connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CosmosDbConfig {
    /// Account endpoint URL
    #[serde(default)]
    pub endpoint: String,

    /// Account access key
    #[serde(default = "empty_key")]
    pub key: SecretKey,

    /// Database name
    #[serde(default)]
    pub database_name: String,
}

impl Default for CosmosDbConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            key: empty_key(),
            database_name: String::new(),
        }
    }
}

impl CosmosDbConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.endpoint.is_empty() {
            return Err("cosmosdb.endpoint cannot be empty".to_string());
        }

        // The local emulator is served over plain http
        let is_emulator = self.endpoint.starts_with("http://localhost")
            || self.endpoint.starts_with("http://127.0.0.1");
        if !self.endpoint.starts_with("https://") && !is_emulator {
            return Err("cosmosdb.endpoint must start with https://".to_string());
        }

        if self.key.expose_secret().is_empty() {
            return Err("cosmosdb.key cannot be empty".to_string());
        }

        if self.database_name.is_empty() {
            return Err("cosmosdb.database_name cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Import pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Directory scanned recursively for input files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// File extensions to import; empty imports every file
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Throughput provisioned for newly created containers
    #[serde(default = "default_throughput")]
    pub throughput: usize,

    /// What to do with the rest of a file after a record fails
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// How record identifiers are assigned
    #[serde(default)]
    pub id_strategy: IdStrategy,

    /// Map files without writing to the database
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            extensions: default_extensions(),
            throughput: default_throughput(),
            failure_policy: FailurePolicy::default(),
            id_strategy: IdStrategy::default(),
            dry_run: false,
        }
    }
}

impl ImportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.data_dir.as_os_str().is_empty() {
            return Err("import.data_dir cannot be empty".to_string());
        }

        if !(MIN_THROUGHPUT..=MAX_THROUGHPUT).contains(&self.throughput) {
            return Err(format!(
                "import.throughput must be between {MIN_THROUGHPUT} and {MAX_THROUGHPUT}, got {}",
                self.throughput
            ));
        }

        if self.throughput % 100 != 0 {
            return Err(format!(
                "import.throughput must be a multiple of 100, got {}",
                self.throughput
            ));
        }

        if let Some(ext) = self.extensions.iter().find(|e| e.trim().is_empty()) {
            return Err(format!("import.extensions contains an empty entry: {ext:?}"));
        }

        Ok(())
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries > 10 {
            return Err(format!(
                "retry.max_retries must be at most 10, got {}",
                self.max_retries
            ));
        }

        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "retry.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }

        if self.initial_delay_ms > self.max_delay_ms {
            return Err("retry.initial_delay_ms cannot exceed retry.max_delay_ms".to_string());
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Also write JSON logs to a rolling file
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid logging.level '{}'. Must be one of: {}",
                self.level,
                valid_levels.join(", ")
            ));
        }

        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when file logging is on".to_string());
        }

        Ok(())
    }
}

// Default value functions
fn empty_key() -> SecretKey {
    secret_key(String::new())
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_extensions() -> Vec<String> {
    vec!["csv".to_string()]
}

fn default_throughput() -> usize {
    MIN_THROUGHPUT
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn valid_config() -> AppConfig {
        AppConfig {
            cosmosdb: CosmosDbConfig {
                endpoint: "https://test.documents.azure.com:443/".to_string(),
                key: secret_key("test-key".to_string()),
                database_name: "imports".to_string(),
            },
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.import.data_dir, PathBuf::from("./data"));
        assert_eq!(config.import.extensions, vec!["csv"]);
        assert_eq!(config.import.throughput, 400);
        assert_eq!(config.import.failure_policy, FailurePolicy::Continue);
        assert_eq!(config.import.id_strategy, IdStrategy::Positional);
        assert_eq!(config.retry.max_retries, 3);
        assert!(!config.logging.local_enabled);
    }

    #[test]
    fn test_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_default_config_is_invalid() {
        let err = AppConfig::default().validate().unwrap_err();
        assert!(err.contains("cosmosdb.endpoint"));
    }

    #[test_case("https://acct.documents.azure.com:443/", true ; "https")]
    #[test_case("http://localhost:8081/", true ; "emulator")]
    #[test_case("http://acct.documents.azure.com/", false ; "plain http")]
    #[test_case("acct.documents.azure.com", false ; "no scheme")]
    fn test_endpoint_scheme(endpoint: &str, ok: bool) {
        let mut config = valid_config();
        config.cosmosdb.endpoint = endpoint.to_string();
        assert_eq!(config.validate().is_ok(), ok);
    }

    #[test_case(400, true ; "minimum")]
    #[test_case(1000, true ; "round")]
    #[test_case(300, false ; "below minimum")]
    #[test_case(450, false ; "not a multiple of 100")]
    fn test_throughput(throughput: usize, ok: bool) {
        let mut config = valid_config();
        config.import.throughput = throughput;
        assert_eq!(config.validate().is_ok(), ok);
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = valid_config();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().unwrap_err().contains("logging.level"));
    }

    #[test]
    fn test_retry_bounds() {
        let mut config = valid_config();
        config.retry.max_retries = 11;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.retry.initial_delay_ms = 60_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_import_section() {
        let config: AppConfig = toml::from_str(
            r#"
[import]
data_dir = "/srv/csv"
extensions = []
failure_policy = "abort"
id_strategy = "column:order_no"
"#,
        )
        .unwrap();

        assert_eq!(config.import.data_dir, PathBuf::from("/srv/csv"));
        assert!(config.import.extensions.is_empty());
        assert_eq!(config.import.failure_policy, FailurePolicy::Abort);
        assert_eq!(
            config.import.id_strategy,
            IdStrategy::Column("order_no".to_string())
        );
    }
}
