//! Data source import: read, hash and type a CSV file.

use std::path::Path;

use dds_model::DataSource;

use crate::detection::detect_columns;
use crate::error::Result;
use crate::hash::content_hash;
use crate::read::{MAX_CSV_FILE_SIZE, RowIssue, check_file_size_with_limit, file_error, parse_csv};

/// An imported data source and the malformed records found while reading it.
#[derive(Debug, Clone)]
pub struct ImportedSource {
    pub source: DataSource,
    pub issues: Vec<RowIssue>,
}

/// Imports a CSV file as a [`DataSource`].
///
/// The returned source has an empty `id`; the store assigns one when the
/// source is added. `name` defaults to the file stem.
pub fn import_data_source(path: &Path, name: Option<&str>) -> Result<ImportedSource> {
    check_file_size_with_limit(path, MAX_CSV_FILE_SIZE)?;
    let bytes = std::fs::read(path).map_err(|e| file_error(path, e))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    import_bytes(&bytes, &file_name, name)
}

/// Imports CSV bytes that have already been read.
pub fn import_bytes(bytes: &[u8], file_name: &str, name: Option<&str>) -> Result<ImportedSource> {
    let parsed = parse_csv(bytes, file_name)?;
    let columns = detect_columns(&parsed.table);
    let name = match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => default_name(file_name),
    };

    tracing::info!(
        file = file_name,
        rows = parsed.table.len(),
        columns = columns.len(),
        issues = parsed.issues.len(),
        "imported data source"
    );

    Ok(ImportedSource {
        source: DataSource {
            id: String::new(),
            name,
            file_name: file_name.to_string(),
            content_hash: content_hash(bytes),
            imported_at: chrono::Utc::now().to_rfc3339(),
            columns,
            table: parsed.table,
            custom_fields: Vec::new(),
        },
        issues: parsed.issues,
    })
}

fn default_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if stem.is_empty() {
        "untitled".to_string()
    } else {
        stem
    }
}
