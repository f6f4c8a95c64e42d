//! Imported data sources.

use serde::{Deserialize, Serialize};

use crate::column::ColumnSpec;
use crate::table::Table;

/// A derived column computed per row from an expression over other columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub name: String,
    pub expression: String,
}

impl CustomField {
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
        }
    }
}

/// A named, imported table together with detected column types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub id: String,
    pub name: String,
    /// File name the table was imported from.
    pub file_name: String,
    /// SHA-256 of the imported bytes, hex encoded.
    pub content_hash: String,
    /// RFC 3339 import timestamp.
    pub imported_at: String,
    pub columns: Vec<ColumnSpec>,
    pub table: Table,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

impl DataSource {
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn custom_field(&self, name: &str) -> Option<&CustomField> {
        self.custom_fields.iter().find(|f| f.name == name)
    }

    pub fn row_count(&self) -> usize {
        self.table.len()
    }
}
