//! Error types for data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while importing a CSV file.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the configured size limit.
    #[error("file {path} is {size} bytes, limit is {max_size} bytes")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Encoding other than UTF-8.
    #[error("unsupported encoding {encoding} in {origin}")]
    UnsupportedEncoding {
        origin: String,
        encoding: &'static str,
    },

    // === CSV Parsing Errors ===
    /// The csv reader rejected the input.
    #[error("failed to parse CSV {origin} at line {line}: {message}")]
    CsvParse {
        origin: String,
        line: u64,
        message: String,
    },

    /// CSV input has no records at all.
    #[error("CSV file is empty: {origin}")]
    EmptyCsv { origin: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
