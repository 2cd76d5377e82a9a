//! Domain error types
//!
//! Errors are grouped by the boundary they come from: configuration, CSV input,
//! the document store and the query façade. Third-party error types are
//! converted to strings at the boundary and never leak through the public API.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum CosmosCsvError {
    /// A required setting is missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed tabular input
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Failure reported by the document store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Query rejected by the document store
    #[error("Query error: {0}")]
    Query(String),

    /// A record or argument violates an invariant
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl CosmosCsvError {
    /// Whether retrying the same operation may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            CosmosCsvError::Store(e) => e.is_transient(),
            _ => false,
        }
    }
}

/// Errors raised while reading a CSV file
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file has no header line
    #[error("{path}: missing header row")]
    MissingHeader { path: PathBuf },

    /// A row does not match the header width, or the bytes are not UTF-8
    #[error("{path}: line {line}: {message}")]
    MalformedRow {
        path: PathBuf,
        line: u64,
        message: String,
    },

    /// The container name cannot be derived from the file name
    #[error("{path}: cannot derive a container name from the file name")]
    InvalidFileName { path: PathBuf },

    /// Two columns share a name, possibly after renaming `id`
    #[error("{path}: duplicate column '{column}'")]
    DuplicateColumn { path: PathBuf, column: String },

    /// The column chosen as identifier source does not exist
    #[error("{path}: id column '{column}' not found in header")]
    MissingIdColumn { path: PathBuf, column: String },

    /// Any other reader failure
    #[error("{path}: {message}")]
    Unreadable { path: PathBuf, message: String },
}

/// Errors reported by a document store
///
/// These errors don't expose SDK types; the Cosmos adapter maps status codes
/// onto the variants below.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to reach the service
    #[error("Failed to connect to Cosmos DB: {0}")]
    ConnectionFailed(String),

    /// Credential rejected (401/403)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Container does not exist
    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    /// Failed to create container
    #[error("Failed to create container: {0}")]
    ContainerCreationFailed(String),

    /// Request rate too large (429)
    #[error("Request rate too large (429): {0}")]
    Throttled(String),

    /// Request timed out (408)
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Conflict (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Document rejected by the service (400, 413)
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Failed to write document
    #[error("Failed to write document: {0}")]
    WriteFailed(String),

    /// Failed to deserialize a response
    #[error("Failed to deserialize response: {0}")]
    DeserializationFailed(String),
}

impl StoreError {
    /// Throttling, timeouts and connection failures are worth retrying;
    /// everything else fails fast.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Throttled(_) | StoreError::Timeout(_) | StoreError::ConnectionFailed(_)
        )
    }

    /// Classify a failure by HTTP status code
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => StoreError::AuthenticationFailed(message),
            404 => StoreError::ContainerNotFound(message),
            408 => StoreError::Timeout(message),
            409 => StoreError::Conflict(message),
            400 | 413 => StoreError::InvalidDocument(message),
            429 => StoreError::Throttled(message),
            500..=599 => StoreError::ConnectionFailed(message),
            _ => StoreError::WriteFailed(message),
        }
    }
}

impl From<std::io::Error> for CosmosCsvError {
    fn from(err: std::io::Error) -> Self {
        CosmosCsvError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CosmosCsvError {
    fn from(err: serde_json::Error) -> Self {
        CosmosCsvError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for CosmosCsvError {
    fn from(err: toml::de::Error) -> Self {
        CosmosCsvError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<walkdir::Error> for CosmosCsvError {
    fn from(err: walkdir::Error) -> Self {
        CosmosCsvError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_error_display() {
        let err = CosmosCsvError::Configuration("DB_URL is not set".to_string());
        assert_eq!(err.to_string(), "Configuration error: DB_URL is not set");
    }

    #[test]
    fn test_parse_error_display_includes_path_and_line() {
        let err = ParseError::MalformedRow {
            path: PathBuf::from("data/orders.csv"),
            line: 3,
            message: "found record with 2 fields, but the previous record has 3 fields"
                .to_string(),
        };
        let text = err.to_string();
        assert!(text.starts_with("data/orders.csv: line 3:"));
    }

    #[test_case(429, true ; "throttled")]
    #[test_case(408, true ; "timeout")]
    #[test_case(503, true ; "service unavailable")]
    #[test_case(401, false ; "unauthorized")]
    #[test_case(409, false ; "conflict")]
    #[test_case(400, false ; "bad request")]
    fn test_status_classification(status: u16, transient: bool) {
        let err = StoreError::from_status(status, "boom");
        assert_eq!(err.is_transient(), transient);
        assert_eq!(CosmosCsvError::from(err).is_transient(), transient);
    }

    #[test]
    fn test_parse_errors_are_not_transient() {
        let err: CosmosCsvError = ParseError::MissingHeader {
            path: PathBuf::from("empty.csv"),
        }
        .into();
        assert!(matches!(err, CosmosCsvError::Parse(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "No such file");
        let err: CosmosCsvError = io_err.into();
        assert!(matches!(err, CosmosCsvError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: CosmosCsvError = toml_err.into();
        assert!(err.to_string().contains("TOML parse error"));
    }
}
