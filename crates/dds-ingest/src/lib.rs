//! Data ingestion for Data Dashboard Studio.
//!
//! Reads CSV files into [`dds_model::Table`]s, detects column types and
//! packages the result as a [`dds_model::DataSource`].
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use dds_ingest::import_data_source;
//!
//! let imported = import_data_source(Path::new("sales.csv"), None)?;
//! for issue in &imported.issues {
//!     eprintln!("line {}: expected {} fields", issue.line, issue.expected);
//! }
//! ```

mod detection;
mod error;
mod frame;
mod hash;
mod import;
mod read;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use read::{
    MAX_CSV_FILE_SIZE, ParsedCsv, RowIssue, build_column_names, check_file_size_with_limit,
    normalize_header, parse_csv, read_csv, validate_encoding,
};

// === Type Detection ===
pub use detection::{
    ColumnProfile, TYPE_THRESHOLD, detect_column_type, detect_columns, profile_columns,
};

// === Import ===
pub use hash::content_hash;
pub use import::{ImportedSource, import_bytes, import_data_source};

// === Polars ===
pub use frame::table_to_dataframe;
