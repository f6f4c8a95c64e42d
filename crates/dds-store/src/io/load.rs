//! Snapshot loading.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::CURRENT_SCHEMA_VERSION;
use crate::error::{Result, StoreError};
use crate::keys;

#[derive(Deserialize)]
struct Header {
    schema_version: u32,
}

#[derive(Deserialize)]
struct Envelope<T> {
    items: Vec<T>,
}

/// A snapshot that could not be read and was treated as empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    pub key: &'static str,
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of reading one key.
#[derive(Debug)]
pub enum Snapshot<T> {
    /// No file yet.
    Missing,
    Loaded(Vec<T>),
    /// Unreadable or malformed; the collection starts empty.
    Corrupt(LoadWarning),
}

impl<T> Snapshot<T> {
    /// Items of the snapshot, empty unless it loaded.
    pub fn into_items(self) -> (Vec<T>, Option<LoadWarning>) {
        match self {
            Snapshot::Missing => (Vec::new(), None),
            Snapshot::Loaded(items) => (items, None),
            Snapshot::Corrupt(warning) => (Vec::new(), Some(warning)),
        }
    }
}

/// Reads the snapshot stored under `key` in `root`.
///
/// Only a snapshot from a newer schema version is an error; anything else
/// that cannot be read degrades to an empty collection with a warning.
pub fn read_snapshot<T: DeserializeOwned>(root: &Path, key: &'static str) -> Result<Snapshot<T>> {
    let path = root.join(keys::file_name(key));
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Snapshot::Missing),
        Err(e) => return Ok(corrupt(key, path, format!("unreadable: {e}"))),
    };

    let header: Header = match serde_json::from_slice(&bytes) {
        Ok(header) => header,
        Err(e) => return Ok(corrupt(key, path, e.to_string())),
    };
    if header.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedVersion {
            key,
            found: header.schema_version,
            max_supported: CURRENT_SCHEMA_VERSION,
            path,
        });
    }

    match serde_json::from_slice::<Envelope<T>>(&bytes) {
        Ok(envelope) => {
            tracing::debug!(key, items = envelope.items.len(), "loaded snapshot");
            Ok(Snapshot::Loaded(envelope.items))
        }
        Err(e) => Ok(corrupt(key, path, e.to_string())),
    }
}

fn corrupt<T>(key: &'static str, path: PathBuf, reason: String) -> Snapshot<T> {
    tracing::warn!(key, path = %path.display(), %reason, "ignoring unreadable snapshot");
    Snapshot::Corrupt(LoadWarning { key, path, reason })
}
