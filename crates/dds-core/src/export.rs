//! Polars export of aggregation results.

use std::fs::File;
use std::path::Path;

use dds_model::{AggregationMode, AggregationResult};
use polars::prelude::*;

use crate::aggregate::SummaryTable;
use crate::error::{CoreError, Result};

/// Two-column frame of group keys and values, in ascending key order.
///
/// A value name equal to the key name gets the aggregation mode appended,
/// as in `region (count)`.
pub fn result_to_dataframe(
    result: &AggregationResult,
    key_name: &str,
    value_name: &str,
) -> Result<DataFrame> {
    let keys: Vec<&str> = result.values.keys().map(String::as_str).collect();
    let values: Vec<f64> = result.values.values().copied().collect();
    let value_name = column_name(value_name, result.mode, &[key_name.to_string()]);
    let df = DataFrame::new(vec![
        Series::new(key_name.into(), keys).into_column(),
        Series::new(value_name.into(), values).into_column(),
    ])?;
    Ok(df)
}

/// Frame with the group column followed by one column per value column.
///
/// Repeated names are made unique the same way as in [`result_to_dataframe`].
pub fn summary_to_dataframe(summary: &SummaryTable) -> Result<DataFrame> {
    let mut names = vec![summary.group_column.clone()];
    let mut columns = Vec::with_capacity(summary.value_columns.len() + 1);
    let keys: Vec<&str> = summary.rows.iter().map(|row| row.key.as_str()).collect();
    columns.push(Series::new(summary.group_column.as_str().into(), keys).into_column());
    for (idx, name) in summary.value_columns.iter().enumerate() {
        let mode = summary.modes.get(idx).copied().unwrap_or_default();
        let name = column_name(name, mode, &names);
        let values: Vec<f64> = summary.rows.iter().map(|row| row.values[idx]).collect();
        columns.push(Series::new(name.as_str().into(), values).into_column());
        names.push(name);
    }
    Ok(DataFrame::new(columns)?)
}

fn column_name(name: &str, mode: AggregationMode, taken: &[String]) -> String {
    if !taken.iter().any(|t| t == name) {
        return name.to_string();
    }
    let base = format!("{name} ({mode})");
    let mut candidate = base.clone();
    let mut n = 2;
    while taken.contains(&candidate) {
        candidate = format!("{base} {n}");
        n += 1;
    }
    candidate
}

/// Writes a frame as CSV with a header row.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|source| CoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    tracing::info!(path = %path.display(), rows = df.height(), "exported CSV");
    Ok(())
}
