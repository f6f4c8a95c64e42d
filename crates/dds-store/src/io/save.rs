//! Snapshot saving.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::CURRENT_SCHEMA_VERSION;
use crate::error::{Result, StoreError};
use crate::keys;

#[derive(Serialize)]
struct Envelope<'a, T> {
    schema_version: u32,
    items: &'a [T],
}

/// Writes `items` under `key` in `root`.
///
/// Uses atomic write (temp file + rename) so a crash never leaves a
/// half-written snapshot behind.
pub fn write_snapshot<T: Serialize>(root: &Path, key: &'static str, items: &[T]) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(&Envelope {
        schema_version: CURRENT_SCHEMA_VERSION,
        items,
    })
    .map_err(|source| StoreError::Serialization { key, source })?;

    fs::create_dir_all(root).map_err(|e| StoreError::Io {
        operation: "create directory",
        path: root.to_path_buf(),
        source: e,
    })?;

    let path = root.join(keys::file_name(key));
    let temp_path = root.join(format!("{}.tmp", keys::file_name(key)));

    let mut file = File::create(&temp_path).map_err(|e| StoreError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(&bytes).map_err(|e| StoreError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    file.sync_all().map_err(|e| StoreError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, &path).map_err(|e| StoreError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.clone(),
        source: e,
    })?;

    tracing::debug!(key, items = items.len(), path = %path.display(), "saved snapshot");
    Ok(())
}
