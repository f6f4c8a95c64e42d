//! Grouped sums and counts over loosely typed tables.
//!
//! Whether a value column is summed or counted is decided once per call: if
//! any cell in the column reads as a finite number the column is summed
//! (cells that do not read as numbers add zero), otherwise rows are counted.

use std::collections::{BTreeMap, BTreeSet};

use dds_model::{AggregateOptions, AggregationMode, AggregationResult, AggregationStats, Table};

/// Groups `table` by `group_column` and sums or counts `value_column`.
///
/// A blank column name yields an empty result. The call never fails:
/// rows without a usable group key are skipped and cells that do not parse
/// contribute zero, both tallied in [`AggregationStats`].
pub fn aggregate(
    table: &Table,
    group_column: &str,
    value_column: &str,
    options: AggregateOptions,
) -> AggregationResult {
    let group_column = group_column.trim();
    let value_column = value_column.trim();
    if group_column.is_empty() || value_column.is_empty() {
        return AggregationResult::empty();
    }

    let mode = detect_mode(table, value_column);
    let mut values: BTreeMap<String, f64> = BTreeMap::new();
    let mut stats = AggregationStats::default();
    let mut last_key = String::new();

    for row in &table.rows {
        stats.rows += 1;

        let mut key = row.get(group_column).as_text().trim().to_string();
        if key.is_empty() && options.fill_down {
            key.clone_from(&last_key);
        }
        if key.is_empty() {
            stats.skipped_rows += 1;
            continue;
        }
        if options.normalize_case {
            key = key.to_lowercase();
        }
        last_key.clone_from(&key);

        let contribution = match mode {
            AggregationMode::Sum => {
                let cell = row.get(value_column);
                match cell.as_number() {
                    Some(value) => value,
                    None => {
                        if cell.is_blank() {
                            stats.blank_values += 1;
                        } else {
                            stats.unparsed_values += 1;
                        }
                        0.0
                    }
                }
            }
            AggregationMode::Count => 1.0,
        };
        *values.entry(key).or_insert(0.0) += contribution;
    }

    tracing::debug!(
        group_column,
        value_column,
        %mode,
        groups = values.len(),
        rows = stats.rows,
        skipped = stats.skipped_rows,
        unparsed = stats.unparsed_values,
        "aggregated"
    );

    AggregationResult {
        values,
        mode,
        stats,
    }
}

/// Sum mode if any cell of the column reads as a finite number.
pub fn detect_mode(table: &Table, value_column: &str) -> AggregationMode {
    if table
        .column_values(value_column)
        .any(|cell| cell.as_number().is_some())
    {
        AggregationMode::Sum
    } else {
        AggregationMode::Count
    }
}

/// Grand total of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnTotal {
    pub total: f64,
    pub mode: AggregationMode,
}

/// Totals a column with the same sum-or-count rule as [`aggregate`].
///
/// In count mode only non-blank cells are counted.
pub fn column_total(table: &Table, value_column: &str) -> ColumnTotal {
    let value_column = value_column.trim();
    let mode = detect_mode(table, value_column);
    let total = match mode {
        AggregationMode::Sum => table
            .column_values(value_column)
            .filter_map(dds_model::CellValue::as_number)
            .sum(),
        AggregationMode::Count => table
            .column_values(value_column)
            .filter(|cell| !cell.is_blank())
            .count() as f64,
    };
    ColumnTotal { total, mode }
}

/// One group key and its value per summarised column.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub key: String,
    pub values: Vec<f64>,
}

/// Several value columns aggregated over the same group column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryTable {
    pub group_column: String,
    pub value_columns: Vec<String>,
    pub modes: Vec<AggregationMode>,
    /// Rows in ascending key order.
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    /// Column totals in `value_columns` order.
    pub fn totals(&self) -> Vec<f64> {
        (0..self.value_columns.len())
            .map(|idx| self.rows.iter().map(|row| row.values[idx]).sum())
            .collect()
    }
}

/// Runs [`aggregate`] for each value column and joins the results by key.
///
/// A key missing from one column's result reads as zero there.
pub fn summarize<S: AsRef<str>>(
    table: &Table,
    group_column: &str,
    value_columns: &[S],
    options: AggregateOptions,
) -> SummaryTable {
    let results: Vec<AggregationResult> = value_columns
        .iter()
        .map(|column| aggregate(table, group_column, column.as_ref(), options))
        .collect();

    let keys: BTreeSet<&String> = results.iter().flat_map(|r| r.values.keys()).collect();
    let rows = keys
        .into_iter()
        .map(|key| SummaryRow {
            key: key.clone(),
            values: results
                .iter()
                .map(|result| result.get(key).unwrap_or(0.0))
                .collect(),
        })
        .collect();

    SummaryTable {
        group_column: group_column.trim().to_string(),
        value_columns: value_columns
            .iter()
            .map(|c| c.as_ref().trim().to_string())
            .collect(),
        modes: results.iter().map(|r| r.mode).collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dds_model::{CellValue, Row};

    fn table(rows: &[(&str, &str)]) -> Table {
        let mut table = Table::new(vec!["g".to_string(), "v".to_string()]);
        for (g, v) in rows {
            table.push_row([("g", *g), ("v", *v)].into_iter().collect());
        }
        table
    }

    fn pairs(result: &AggregationResult) -> Vec<(&str, f64)> {
        result.values.iter().map(|(k, v)| (k.as_str(), *v)).collect()
    }

    #[test]
    fn blank_column_names_give_empty_result() {
        let t = table(&[("A", "1")]);
        let options = AggregateOptions::default();
        assert!(aggregate(&t, "", "v", options).is_empty());
        assert!(aggregate(&t, "g", "  ", options).is_empty());
    }

    #[test]
    fn text_values_are_counted() {
        let t = table(&[("A", "x"), ("B", "y"), ("A", "z"), ("A", "")]);
        let result = aggregate(&t, "g", "v", AggregateOptions::default());
        assert_eq!(result.mode, AggregationMode::Count);
        assert_eq!(pairs(&result), vec![("A", 3.0), ("B", 1.0)]);
    }

    #[test]
    fn one_number_switches_whole_column_to_sum() {
        let t = table(&[("A", "x"), ("A", "2"), ("B", "y")]);
        let result = aggregate(&t, "g", "v", AggregateOptions::default());
        assert_eq!(result.mode, AggregationMode::Sum);
        assert_eq!(pairs(&result), vec![("A", 2.0), ("B", 0.0)]);
        assert_eq!(result.stats.unparsed_values, 2);
    }

    #[test]
    fn locale_numbers_are_summed() {
        let t = table(&[("A", "70.000"), ("A", "90,000"), ("B", "1 200"), ("B", "3,14")]);
        let result = aggregate(&t, "g", "v", AggregateOptions::default());
        assert_eq!(result.get("A"), Some(160_000.0));
        assert_eq!(result.get("B"), Some(1203.14));
    }

    #[test]
    fn fill_down_inherits_previous_key() {
        let t = table(&[("A", "1"), ("", "2"), ("B", "3")]);
        let options = AggregateOptions::new().with_fill_down(true);
        assert_eq!(
            pairs(&aggregate(&t, "g", "v", options)),
            vec![("A", 3.0), ("B", 3.0)]
        );

        let without = aggregate(&t, "g", "v", AggregateOptions::default());
        assert_eq!(pairs(&without), vec![("A", 1.0), ("B", 3.0)]);
        assert_eq!(without.stats.skipped_rows, 1);
    }

    #[test]
    fn fill_down_skips_leading_blank() {
        let t = table(&[("", "5"), ("X", "1")]);
        let result = aggregate(&t, "g", "v", AggregateOptions::new().with_fill_down(true));
        assert_eq!(pairs(&result), vec![("X", 1.0)]);
        assert_eq!(result.stats.skipped_rows, 1);
    }

    #[test]
    fn case_normalisation() {
        let t = table(&[("Apple", "1"), ("apple", "2")]);
        let folded = aggregate(&t, "g", "v", AggregateOptions::new().with_normalize_case(true));
        assert_eq!(pairs(&folded), vec![("apple", 3.0)]);
        let kept = aggregate(&t, "g", "v", AggregateOptions::default());
        assert_eq!(pairs(&kept), vec![("Apple", 1.0), ("apple", 2.0)]);
    }

    #[test]
    fn missing_value_column_counts_rows() {
        let t = table(&[("A", "1"), ("A", "2")]);
        let result = aggregate(&t, "g", "nope", AggregateOptions::default());
        assert_eq!(result.mode, AggregationMode::Count);
        assert_eq!(pairs(&result), vec![("A", 2.0)]);
    }

    #[test]
    fn native_numbers_and_keys() {
        let mut t = Table::new(vec!["g".to_string(), "v".to_string()]);
        let mut row = Row::new();
        row.insert("g", CellValue::Number(2024.0));
        row.insert("v", CellValue::Number(1.5));
        t.push_row(row);
        let result = aggregate(&t, "g", "v", AggregateOptions::default());
        assert_eq!(pairs(&result), vec![("2024", 1.5)]);
    }

    #[test]
    fn column_totals() {
        let t = table(&[("A", "1"), ("B", "x"), ("C", "2,5")]);
        assert_eq!(
            column_total(&t, "v"),
            ColumnTotal {
                total: 3.5,
                mode: AggregationMode::Sum
            }
        );
        let t = table(&[("A", "x"), ("B", ""), ("C", "y")]);
        assert_eq!(column_total(&t, "v").total, 2.0);
        assert_eq!(column_total(&t, "v").mode, AggregationMode::Count);
    }

    #[test]
    fn summarize_joins_columns() {
        let mut t = Table::new(vec!["g".to_string(), "a".to_string(), "b".to_string()]);
        t.push_row([("g", "X"), ("a", "1"), ("b", "k")].into_iter().collect());
        t.push_row([("g", "Y"), ("a", "2"), ("b", "")].into_iter().collect());
        t.push_row([("g", "X"), ("a", "3"), ("b", "k")].into_iter().collect());

        let summary = summarize(&t, "g", &["a", "b"], AggregateOptions::default());
        assert_eq!(summary.value_columns, vec!["a", "b"]);
        assert_eq!(
            summary.modes,
            vec![AggregationMode::Sum, AggregationMode::Count]
        );
        assert_eq!(
            summary.rows,
            vec![
                SummaryRow {
                    key: "X".to_string(),
                    values: vec![4.0, 2.0]
                },
                SummaryRow {
                    key: "Y".to_string(),
                    values: vec![2.0, 1.0]
                },
            ]
        );
        assert_eq!(summary.totals(), vec![6.0, 3.0]);
    }
}
