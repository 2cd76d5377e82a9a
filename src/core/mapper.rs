//! CSV to record mapping
//!
//! Turns one delimited file into a [`MappedTable`]: the container name comes
//! from the file stem, a source `id` column is renamed to `data_id`, each
//! cell gets a JSON type, and every row receives a string `id`. The
//! partition attribute of the table is its first column after renaming.
//!
//! ```
//! use cosmos_csv::core::mapper::{map_csv_reader, MapperOptions};
//! use std::path::Path;
//!
//! let csv = "id,customer,amount\n5,Alice,10.0\n";
//! let table = map_csv_reader(
//!     Path::new("orders.csv"),
//!     "orders".to_string(),
//!     csv.as_bytes(),
//!     &MapperOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(table.partition_attribute(), "data_id");
//! assert_eq!(table.records[0].id(), Some("0"));
//! ```

use crate::domain::{
    ContainerSpec, CosmosCsvError, ParseError, Record, Result, ID_FIELD, RENAMED_ID_FIELD,
};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// How the `id` of each record is assigned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IdStrategy {
    /// Zero-based row position within the file
    #[default]
    Positional,

    /// SHA-256 of the row's column names and raw values
    ContentHash,

    /// Raw value of the named source column
    Column(String),
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(column) = s.strip_prefix("column:") {
            let column = column.trim();
            if column.is_empty() {
                return Err("id strategy 'column:' needs a column name".to_string());
            }
            return Ok(IdStrategy::Column(column.to_string()));
        }

        match s.to_lowercase().as_str() {
            "positional" | "position" | "row" => Ok(IdStrategy::Positional),
            "content_hash" | "content-hash" | "hash" => Ok(IdStrategy::ContentHash),
            _ => Err(format!(
                "invalid id strategy '{s}'. Expected 'positional', 'content_hash' or 'column:<name>'"
            )),
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStrategy::Positional => f.write_str("positional"),
            IdStrategy::ContentHash => f.write_str("content_hash"),
            IdStrategy::Column(column) => write!(f, "column:{column}"),
        }
    }
}

impl TryFrom<String> for IdStrategy {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IdStrategy> for String {
    fn from(strategy: IdStrategy) -> Self {
        strategy.to_string()
    }
}

/// Mapping options
#[derive(Debug, Clone, Default)]
pub struct MapperOptions {
    /// Identifier assignment
    pub id_strategy: IdStrategy,
}

/// Records mapped from one file
#[derive(Debug, Clone)]
pub struct MappedTable {
    /// Target container, the file stem
    pub container_name: String,

    /// Column names after renaming, in source order; never empty
    pub columns: Vec<String>,

    /// One record per data row, in file order
    pub records: Vec<Record>,
}

impl MappedTable {
    /// Attribute the container is partitioned on
    pub fn partition_attribute(&self) -> &str {
        &self.columns[0]
    }

    /// Container descriptor for this table
    pub fn container_spec(&self, throughput: usize) -> ContainerSpec {
        ContainerSpec::new(
            self.container_name.clone(),
            self.partition_attribute(),
            throughput,
        )
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the file had no data rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Container name derived from a file path
///
/// # Errors
///
/// Returns [`ParseError::InvalidFileName`] when the stem is empty or not UTF-8.
pub fn container_name_for(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with('.'))
        .map(str::to_string)
        .ok_or_else(|| {
            ParseError::InvalidFileName {
                path: path.to_path_buf(),
            }
            .into()
        })
}

/// Read and map one file
pub fn map_csv_file(path: &Path, options: &MapperOptions) -> Result<MappedTable> {
    let container_name = container_name_for(path)?;
    let file = File::open(path).map_err(|e| ParseError::Unreadable {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    map_csv_reader(path, container_name, file, options)
}

/// Map CSV data from any reader
///
/// `source` is only used in error messages.
///
/// # Errors
///
/// Returns a [`ParseError`] for a missing header, a row whose width differs
/// from the header, invalid UTF-8, duplicate column names, or a missing id
/// column. The whole file is rejected; no partial table is returned.
pub fn map_csv_reader<R: Read>(
    source: &Path,
    container_name: String,
    reader: R,
    options: &MapperOptions,
) -> Result<MappedTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(source, e))?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(ParseError::MissingHeader {
            path: source.to_path_buf(),
        }
        .into());
    }

    let columns = rename_columns(source, &headers)?;
    let id_column = match &options.id_strategy {
        IdStrategy::Column(name) => Some(headers.iter().position(|h| h == name).ok_or_else(
            || ParseError::MissingIdColumn {
                path: source.to_path_buf(),
                column: name.clone(),
            },
        )?),
        _ => None,
    };

    let mut records = Vec::new();
    let mut seen_ids = HashSet::new();

    for (position, row) in reader.records().enumerate() {
        let row = row.map_err(|e| csv_error(source, e))?;
        let line = row.position().map_or(0, |p| p.line());

        let mut record = Record::new();
        for (column, raw) in columns.iter().zip(row.iter()) {
            let value = if column == RENAMED_ID_FIELD {
                Value::String(raw.to_string())
            } else {
                infer_value(raw)
            };
            record.insert(column.clone(), value);
        }

        let id = match (&options.id_strategy, id_column) {
            (IdStrategy::Column(name), Some(index)) => {
                let raw = row.get(index).unwrap_or_default().trim();
                if raw.is_empty() {
                    return Err(ParseError::MalformedRow {
                        path: source.to_path_buf(),
                        line,
                        message: format!("empty value in id column '{name}'"),
                    }
                    .into());
                }
                raw.to_string()
            }
            (IdStrategy::ContentHash, _) => content_hash(&headers, &row),
            _ => position.to_string(),
        };

        if !seen_ids.insert(id.clone()) {
            tracing::warn!(
                file = %source.display(),
                line,
                id = %id,
                "Duplicate id in file; the later row will replace the earlier one"
            );
        }

        record.set_id(id);
        records.push(record);
    }

    tracing::debug!(
        file = %source.display(),
        container = %container_name,
        rows = records.len(),
        "Mapped file"
    );

    Ok(MappedTable {
        container_name,
        columns,
        records,
    })
}

/// Rename `id` to `data_id` and reject duplicate or reserved names
fn rename_columns(source: &Path, headers: &[String]) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(headers.len());

    for header in headers {
        let column = if header == ID_FIELD {
            RENAMED_ID_FIELD.to_string()
        } else {
            header.clone()
        };
        if !seen.insert(column.clone()) {
            return Err(ParseError::DuplicateColumn {
                path: source.to_path_buf(),
                column,
            }
            .into());
        }
        columns.push(column);
    }
    Ok(columns)
}

/// Typed JSON value for one cell
///
/// Empty cells become null. Integers and finite floats become numbers,
/// `true`/`false` (any case) become booleans, anything else stays a string.
pub fn infer_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::from(i);
    }
    if let Some(n) = trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
    {
        return Value::Number(n);
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    Value::String(raw.to_string())
}

fn content_hash(headers: &[String], row: &csv::StringRecord) -> String {
    let mut hasher = Sha256::new();
    for (header, raw) in headers.iter().zip(row.iter()) {
        hasher.update(header.as_bytes());
        hasher.update([0x1f]);
        hasher.update(raw.as_bytes());
        hasher.update([0x1e]);
    }
    format!("{:x}", hasher.finalize())
}

fn csv_error(source: &Path, err: csv::Error) -> CosmosCsvError {
    let line = err.position().map_or(0, |p| p.line());
    match err.kind() {
        csv::ErrorKind::Io(e) => ParseError::Unreadable {
            path: source.to_path_buf(),
            message: e.to_string(),
        },
        _ => ParseError::MalformedRow {
            path: source.to_path_buf(),
            line,
            message: err.to_string(),
        },
    }
    .into()
}
