//! Error types for the designspace library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for designspace operations.
#[derive(Debug, Error)]
pub enum DesignSpaceError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Empty file or no data to import.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// An update does not match the shape of the loaded dataset.
    #[error("Inconsistent import at row {row}: expected {expected} fields, found {found}")]
    InconsistentImport {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// No parameter with the given name or id.
    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    /// No design with the given id.
    #[error("Design not found: {0}")]
    DesignNotFound(u64),

    /// No axis for the given parameter.
    #[error("Axis not found: {0}")]
    AxisNotFound(String),

    /// No cluster with the given name or id.
    #[error("Cluster not found: {0}")]
    ClusterNotFound(String),

    /// A name is already taken within its collection.
    #[error("Duplicate name: '{0}'")]
    DuplicateName(String),

    /// A discrete index is not backed by a level.
    #[error("Corrupt data in parameter '{parameter}': index {index} out of {level_count} levels")]
    CorruptData {
        parameter: String,
        index: usize,
        level_count: usize,
    },

    /// A parameter cannot take the requested type.
    #[error("Invalid type for parameter '{parameter}': {message}")]
    InvalidType { parameter: String, message: String },

    /// A long-running operation was cancelled by the caller.
    #[error("Operation cancelled after {rows_processed} rows")]
    Cancelled { rows_processed: usize },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for designspace operations.
pub type Result<T> = std::result::Result<T, DesignSpaceError>;
