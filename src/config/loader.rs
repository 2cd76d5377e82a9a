//! Configuration loader
//!
//! Builds an [`AppConfig`] from defaults, an optional TOML file and the
//! process environment, then validates it. Nothing here touches the network,
//! so a missing setting fails before any connection is attempted.

use super::schema::AppConfig;
use super::secret::secret_key;
use crate::domain::{CosmosCsvError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Account endpoint URL (required)
pub const ENV_DB_URL: &str = "DB_URL";

/// Account access key (required)
pub const ENV_DB_SECRET: &str = "DB_SECRET";

/// Database name (required)
pub const ENV_DB_NAME: &str = "DB_NAME";

/// Loads configuration from the process environment and an optional file
///
/// # Errors
///
/// Returns [`CosmosCsvError::Configuration`] if the file cannot be read or
/// parsed, a referenced variable is unset, a required setting is missing, or
/// validation fails.
///
/// # Examples
///
/// ```no_run
/// use cosmos_csv::config::load_config;
///
/// let config = load_config(None).expect("DB_URL, DB_SECRET and DB_NAME must be set");
/// println!("{}", config.cosmosdb.database_name);
/// ```
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    load_config_with(path, |name| std::env::var(name).ok())
}

/// Same as [`load_config`], reading variables through `lookup`
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_config_file(path, &lookup)?,
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, &lookup)?;
    check_required(&config)?;

    config.validate().map_err(|e| {
        CosmosCsvError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

fn read_config_file<F>(path: &Path, lookup: &F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if !path.exists() {
        return Err(CosmosCsvError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CosmosCsvError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    let contents = substitute_env_vars(&contents, lookup)?;
    Ok(toml::from_str(&contents)?)
}

/// Replaces `${VAR_NAME}` placeholders outside comment lines
fn substitute_env_vars<F>(input: &str, lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| CosmosCsvError::Configuration(e.to_string()))?;
    let mut missing: Vec<String> = Vec::new();

    let lines: Vec<String> = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                return line.to_string();
            }
            re.replace_all(line, |caps: &regex::Captures<'_>| {
                lookup(&caps[1]).unwrap_or_else(|| {
                    if !missing.iter().any(|m| m == &caps[1]) {
                        missing.push(caps[1].to_string());
                    }
                    String::new()
                })
            })
            .into_owned()
        })
        .collect();

    if !missing.is_empty() {
        return Err(CosmosCsvError::Configuration(format!(
            "Missing required environment variables: {}",
            missing.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies the environment on top of file values
fn apply_env_overrides<F>(config: &mut AppConfig, lookup: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(ENV_DB_URL) {
        config.cosmosdb.endpoint = val;
    }
    if let Some(val) = lookup(ENV_DB_SECRET) {
        config.cosmosdb.key = secret_key(val);
    }
    if let Some(val) = lookup(ENV_DB_NAME) {
        config.cosmosdb.database_name = val;
    }

    if let Some(val) = lookup("COSMOS_CSV_DATA_DIR") {
        config.import.data_dir = val.into();
    }
    if let Some(val) = lookup("COSMOS_CSV_EXTENSIONS") {
        config.import.extensions = val
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Some(val) = lookup("COSMOS_CSV_THROUGHPUT") {
        config.import.throughput = parse_setting("COSMOS_CSV_THROUGHPUT", &val)?;
    }
    if let Some(val) = lookup("COSMOS_CSV_FAILURE_POLICY") {
        config.import.failure_policy = parse_setting("COSMOS_CSV_FAILURE_POLICY", &val)?;
    }
    if let Some(val) = lookup("COSMOS_CSV_ID_STRATEGY") {
        config.import.id_strategy = parse_setting("COSMOS_CSV_ID_STRATEGY", &val)?;
    }
    if let Some(val) = lookup("COSMOS_CSV_DRY_RUN") {
        config.import.dry_run = parse_setting("COSMOS_CSV_DRY_RUN", &val)?;
    }
    if let Some(val) = lookup("COSMOS_CSV_MAX_RETRIES") {
        config.retry.max_retries = parse_setting("COSMOS_CSV_MAX_RETRIES", &val)?;
    }

    if let Some(val) = lookup("COSMOS_CSV_LOG_LEVEL") {
        config.logging.level = val;
    }
    if let Some(val) = lookup("COSMOS_CSV_LOG_DIR") {
        config.logging.local_enabled = true;
        config.logging.local_path = val;
    }

    Ok(())
}

fn parse_setting<T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        CosmosCsvError::Configuration(format!("Invalid value for {name} ({value:?}): {e}"))
    })
}

/// Reports every missing connection setting at once
fn check_required(config: &AppConfig) -> Result<()> {
    use secrecy::ExposeSecret;

    let mut missing = Vec::new();
    if config.cosmosdb.endpoint.is_empty() {
        missing.push(ENV_DB_URL);
    }
    if config.cosmosdb.key.expose_secret().is_empty() {
        missing.push(ENV_DB_SECRET);
    }
    if config.cosmosdb.database_name.is_empty() {
        missing.push(ENV_DB_NAME);
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CosmosCsvError::Configuration(format!(
            "Missing required settings: {}",
            missing.join(", ")
        )))
    }
}
