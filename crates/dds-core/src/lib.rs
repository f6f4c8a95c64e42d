//! Derived data for Data Dashboard Studio.
//!
//! Everything here is computed on demand from in-memory tables: grouped
//! aggregates, materialised custom fields and chart series. Nothing in this
//! crate touches the store.

pub mod aggregate;
pub mod chart;
pub mod error;
pub mod export;
pub mod fields;

pub use aggregate::{
    ColumnTotal, SummaryRow, SummaryTable, aggregate, column_total, detect_mode, summarize,
};
pub use chart::{ChartPoint, ChartSeries, build_series};
pub use error::{CoreError, Result};
pub use export::{result_to_dataframe, summary_to_dataframe, write_csv};
pub use fields::{
    aggregate_source, apply_custom_fields, materialize, preview_expression, run_summary,
};
