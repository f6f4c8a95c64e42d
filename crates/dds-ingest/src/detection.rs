//! Column type detection.

use dds_common::is_date;
use dds_model::{CellValue, ColumnSpec, ColumnType, Table};

/// Share of non-empty values that must agree before a type is chosen.
/// The comparison is strict: exactly 80% is not enough.
pub const TYPE_THRESHOLD: f64 = 0.8;

/// Counts behind a column's detected type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnProfile {
    pub non_empty: usize,
    pub numeric: usize,
    pub dates: usize,
}

impl ColumnProfile {
    /// Profiles a sequence of cells. Blank cells are ignored.
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let mut profile = Self::default();
        for value in values {
            if value.is_blank() {
                continue;
            }
            profile.non_empty += 1;
            if value.as_number().is_some() {
                profile.numeric += 1;
            }
            if let CellValue::Text(text) = value
                && is_date(text)
            {
                profile.dates += 1;
            }
        }
        profile
    }

    pub fn numeric_ratio(&self) -> f64 {
        ratio(self.numeric, self.non_empty)
    }

    pub fn date_ratio(&self) -> f64 {
        ratio(self.dates, self.non_empty)
    }

    pub fn column_type(&self) -> ColumnType {
        if self.non_empty == 0 {
            ColumnType::String
        } else if self.numeric_ratio() > TYPE_THRESHOLD {
            ColumnType::Number
        } else if self.date_ratio() > TYPE_THRESHOLD {
            ColumnType::Date
        } else {
            ColumnType::String
        }
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Detects the type of a column from its values.
pub fn detect_column_type<'a>(values: impl IntoIterator<Item = &'a CellValue>) -> ColumnType {
    ColumnProfile::from_values(values).column_type()
}

/// Profiles every column of a table, in column order.
pub fn profile_columns(table: &Table) -> Vec<(String, ColumnProfile)> {
    table
        .columns
        .iter()
        .map(|name| {
            (
                name.clone(),
                ColumnProfile::from_values(table.column_values(name)),
            )
        })
        .collect()
}

/// Detects a [`ColumnSpec`] for every column of a table.
pub fn detect_columns(table: &Table) -> Vec<ColumnSpec> {
    profile_columns(table)
        .into_iter()
        .map(|(name, profile)| ColumnSpec::new(name, profile.column_type()))
        .collect()
}
