//! Aggregation options and results.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Options for grouping rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateOptions {
    /// Lower-case group keys so "Apple" and "apple" share a bucket.
    #[serde(default)]
    pub normalize_case: bool,

    /// Rows with a blank group cell inherit the previous non-blank key
    /// (merged cells in spreadsheet exports).
    #[serde(default)]
    pub fill_down: bool,
}

impl AggregateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalize_case(mut self, enable: bool) -> Self {
        self.normalize_case = enable;
        self
    }

    pub fn with_fill_down(mut self, enable: bool) -> Self {
        self.fill_down = enable;
        self
    }
}

/// How value cells contributed to the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    /// At least one value cell was numeric: values were summed.
    Sum,
    /// No value cell was numeric: rows were counted.
    #[default]
    Count,
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationMode::Sum => f.write_str("sum"),
            AggregationMode::Count => f.write_str("count"),
        }
    }
}

/// Bookkeeping for cells the aggregation absorbed silently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationStats {
    /// Rows visited.
    pub rows: usize,
    /// Rows dropped because no group key could be determined.
    pub skipped_rows: usize,
    /// Blank value cells in sum mode (contributed zero).
    pub blank_values: usize,
    /// Non-blank value cells that did not parse in sum mode (contributed zero).
    pub unparsed_values: usize,
}

/// Display order for aggregated values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    KeyAsc,
    KeyDesc,
    ValueAsc,
    ValueDesc,
}

/// Group key to summed or counted value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub values: BTreeMap<String, f64>,
    pub mode: AggregationMode,
    pub stats: AggregationStats,
}

impl AggregationResult {
    /// An empty result, returned when a column is not specified.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of all group values.
    pub fn total(&self) -> f64 {
        self.values.values().sum()
    }

    /// Entries in the requested order. Value orders break ties by key.
    pub fn sorted(&self, order: SortOrder) -> Vec<(String, f64)> {
        let mut entries: Vec<(String, f64)> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        match order {
            SortOrder::KeyAsc => {}
            SortOrder::KeyDesc => entries.reverse(),
            SortOrder::ValueAsc => entries.sort_by(by_value),
            SortOrder::ValueDesc => {
                entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            }
        }
        entries
    }

    /// The first `n` entries in the requested order.
    pub fn top(&self, order: SortOrder, n: usize) -> Vec<(String, f64)> {
        let mut entries = self.sorted(order);
        entries.truncate(n);
        entries
    }
}

fn by_value(a: &(String, f64), b: &(String, f64)) -> Ordering {
    a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0))
}
