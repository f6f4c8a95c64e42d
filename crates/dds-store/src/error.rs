//! Store error types.
//!
//! All store operations return structured errors that provide
//! user-friendly messages and optional remediation hints.

use std::path::PathBuf;

use dds_core::CoreError;
use dds_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O error.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("failed to replace {target_path}: {source}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("failed to serialize {key}: {source}")]
    Serialization {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Snapshot written by a newer version.
    #[error("{key} snapshot version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        key: &'static str,
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    /// No item with this id.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    /// An item refers to something that does not exist or does not fit.
    #[error("invalid reference: {reason}")]
    InvalidReference { reason: String },

    /// A name is already taken.
    #[error("{kind} name {name:?} is already in use")]
    DuplicateName { kind: &'static str, name: String },

    /// Every id for this prefix is taken.
    #[error("no {prefix} ids are left to assign")]
    IdsExhausted { prefix: &'static str },

    /// Name is blank after trimming.
    #[error("{kind} name must not be blank")]
    BlankName { kind: &'static str },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl StoreError {
    pub(crate) fn not_found(kind: &'static str, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {operation} the file at {}", path.display()),
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save the file to {}. Please check disk space and permissions.",
                target_path.display()
            ),
            Self::Serialization { key, .. } => {
                format!("An error occurred while saving {key}.")
            }
            Self::UnsupportedVersion {
                key,
                found,
                max_supported,
                ..
            } => format!(
                "The {key} snapshot was written by a newer version of Data Dashboard Studio \
                (snapshot version {found}, this version supports up to {max_supported}). \
                Please update the application."
            ),
            other => other.to_string(),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or try a different store directory.".into())
            }
            Self::UnsupportedVersion { .. } => {
                Some("Install the latest version or point --store at another directory.".into())
            }
            Self::NotFound { kind, .. } => Some(format!("List the existing {kind}s to find its id.")),
            _ => None,
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = StoreError::not_found("chart", "chart-9");
        assert_eq!(err.to_string(), "chart chart-9 not found");
        assert_eq!(
            err.suggestion().as_deref(),
            Some("List the existing charts to find its id.")
        );

        let err = StoreError::UnsupportedVersion {
            key: "dds.charts",
            found: 3,
            max_supported: 1,
            path: PathBuf::from("/tmp/dds.charts.json"),
        };
        assert!(err.user_message().contains("snapshot version 3"));
    }
}
