//! Error types for the Utthan library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Utthan operations.
#[derive(Debug, Error)]
pub enum UtthanError {
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

    /// The workbook could not be opened or a worksheet could not be read.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no data rows.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Required columns are absent from the header row.
    #[error("Schema mismatch: missing required column(s) {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    /// A view needs a column that the loaded dataset does not have.
    #[error("No data: column '{0}' is not present in the dataset")]
    MissingColumn(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<calamine::Error> for UtthanError {
    fn from(err: calamine::Error) -> Self {
        UtthanError::Spreadsheet(err.to_string())
    }
}

/// Result type alias for Utthan operations.
pub type Result<T> = std::result::Result<T, UtthanError>;
