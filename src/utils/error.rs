// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("Failed to open workbook {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("Workbook contains no sheets")]
    NoSheets,

    #[error("Failed to read sheet '{sheet}': {reason}")]
    SheetRead { sheet: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("No header row with year labels found in the first {0} rows")]
    NoHeaderRow(usize),

    #[error("No year columns found in header row {0}")]
    NoYearColumns(usize), // 1-based row number

    #[error("No valid data points found")]
    NoValidDataPoints,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Everything that can go wrong while converting a single source file.
/// Never crosses the per-file boundary: the batch driver records it as a failed outcome.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Workbook(#[from] WorkbookError),

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
