//! Result type alias for cosmos-csv

use super::errors::CosmosCsvError;

/// Result type alias used throughout the crate.
///
/// # Examples
///
/// ```
/// use cosmos_csv::domain::result::Result;
/// use cosmos_csv::domain::errors::CosmosCsvError;
///
/// fn failing_function() -> Result<()> {
///     Err(CosmosCsvError::Validation("record has no id".to_string()))
/// }
///
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, CosmosCsvError>;
