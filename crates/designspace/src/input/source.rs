//! Data source abstraction and metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Text stored for a cell that has no value.
pub const MISSING_VALUE: &str = "-";

/// Metadata about the source data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was read.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been read.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Already-split tabular text: one header per column and one row of fields
/// per design.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
    /// The delimiter used.
    pub delimiter: u8,
}

impl DataTable {
    /// Create a new data table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, delimiter: u8) -> Self {
        Self {
            headers,
            rows,
            delimiter,
        }
    }

    /// Build a table from raw records as delivered by a tokenizer.
    ///
    /// With `has_header` the first record names the columns; otherwise the
    /// columns are called `Parameter 1`, `Parameter 2`, ... after the widest
    /// record.
    pub fn from_records(mut records: Vec<Vec<String>>, has_header: bool) -> Self {
        let headers = if has_header && !records.is_empty() {
            records.remove(0)
        } else {
            let width = records.iter().map(Vec::len).max().unwrap_or(0);
            default_headers(width)
        };
        Self::new(headers, records, b',')
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }
}

/// Names used for the columns of a file without a header line.
pub fn default_headers(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("Parameter {}", i + 1)).collect()
}

/// Normalize a field: blank or absent fields become [`MISSING_VALUE`].
pub(crate) fn cell_text(field: Option<&str>) -> &str {
    match field {
        Some(value) if !value.trim().is_empty() => value.trim(),
        _ => MISSING_VALUE,
    }
}
