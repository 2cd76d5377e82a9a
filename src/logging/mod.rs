//! Logging and observability
//!
//! Structured logging with:
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Optional JSON log files with daily or hourly rotation
//!
//! # Example
//!
//! ```no_run
//! use cosmos_csv::logging::init_logging;
//! use cosmos_csv::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log progress through a file's records
///
/// # Example
///
/// ```no_run
/// use cosmos_csv::log_record_progress;
///
/// log_record_progress!(10, 250);
/// ```
#[macro_export]
macro_rules! log_record_progress {
    ($current:expr, $total:expr) => {
        tracing::debug!(
            current = $current,
            total = $total,
            progress_pct = ($current as f64 / ($total as f64).max(1.0) * 100.0),
            "Processing record"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use cosmos_csv::log_retry_attempt;
///
/// log_retry_attempt!(2, 4, "Request rate too large");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = %$reason,
            "Retrying operation"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use cosmos_csv::log_error_with_context;
/// use cosmos_csv::domain::CosmosCsvError;
///
/// let error = CosmosCsvError::Configuration("DB_URL is not set".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
