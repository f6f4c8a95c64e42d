//! CSV reading into in-memory tables.

use std::path::Path;

use csv::ReaderBuilder;
use dds_model::{CellValue, Row, Table};

use crate::error::{IngestError, Result};

use super::header::build_column_names;

/// Maximum file size for CSV loading (500 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// A record whose field count differs from the header.
///
/// The record is still loaded: missing fields read as empty and extra
/// fields are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssue {
    /// 1-based line number in the source.
    pub line: u64,
    pub expected: usize,
    pub found: usize,
}

/// Result of parsing a CSV document.
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    pub table: Table,
    pub issues: Vec<RowIssue>,
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| file_error(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Reject UTF-16 input, which the reader does not decode.
pub fn validate_encoding(bytes: &[u8], origin: &str) -> Result<()> {
    if bytes.len() >= 2 {
        if bytes[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                origin: origin.to_string(),
                encoding: "UTF-16 LE",
            });
        }
        if bytes[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                origin: origin.to_string(),
                encoding: "UTF-16 BE",
            });
        }
    }
    Ok(())
}

/// Reads a CSV file from disk.
pub fn read_csv(path: &Path) -> Result<ParsedCsv> {
    check_file_size_with_limit(path, MAX_CSV_FILE_SIZE)?;
    let bytes = std::fs::read(path).map_err(|e| file_error(path, e))?;
    parse_csv(&bytes, &path.display().to_string())
}

/// Parses CSV bytes with a header row.
///
/// `origin` names the input in errors and log events.
pub fn parse_csv(bytes: &[u8], origin: &str) -> Result<ParsedCsv> {
    validate_encoding(bytes, origin)?;
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut columns: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    let mut issues = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|e| csv_error(&e, origin))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let Some(header) = columns.as_ref() else {
            columns = Some(build_column_names(record.iter()));
            continue;
        };
        let line = record.position().map_or(0, csv::Position::line);
        if record.len() != header.len() {
            tracing::warn!(
                origin,
                line,
                expected = header.len(),
                found = record.len(),
                "record length differs from header"
            );
            issues.push(RowIssue {
                line,
                expected: header.len(),
                found: record.len(),
            });
        }
        let mut row = Row::new();
        for (idx, name) in header.iter().enumerate() {
            let value = record.get(idx).map_or(CellValue::Empty, CellValue::from_raw);
            row.insert(name.clone(), value);
        }
        rows.push(row);
    }

    let Some(columns) = columns else {
        return Err(IngestError::EmptyCsv {
            origin: origin.to_string(),
        });
    };

    tracing::debug!(
        origin,
        columns = columns.len(),
        rows = rows.len(),
        issues = issues.len(),
        "parsed CSV"
    );
    Ok(ParsedCsv {
        table: Table { columns, rows },
        issues,
    })
}

pub(crate) fn file_error(path: &Path, err: std::io::Error) -> IngestError {
    if err.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

fn csv_error(err: &csv::Error, origin: &str) -> IngestError {
    IngestError::CsvParse {
        origin: origin.to_string(),
        line: err.position().map_or(0, csv::Position::line),
        message: err.to_string(),
    }
}
