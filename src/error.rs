//! Error types for trade_recap

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for trade_recap
///
/// Per-row problems (bad contract code, missing price or volume) never reach
/// this type: they surface as `None` fields on the enriched trade instead.
#[derive(Error, Debug)]
pub enum RecapError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Column '{column}' not found in {}", .path.display())]
    MissingColumn { column: String, path: PathBuf },

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("No usable trade data in any input file")]
    NoData,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("Workbook error: {0}")]
    WorkbookError(#[from] rust_xlsxwriter::XlsxError),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type alias for trade_recap operations
pub type Result<T> = std::result::Result<T, RecapError>;
