//! Terminal rendering of tables and charts.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use dds_common::format_number;
use dds_core::ChartSeries;
use dds_model::ChartKind;
use polars::prelude::{AnyValue, DataFrame, DataType};

/// Width of the longest bar, in characters.
pub const BAR_WIDTH: usize = 40;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// A styled table with the given headers.
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_header(headers.iter().map(|h| header_cell(h)).collect::<Vec<_>>());
    apply_table_style(&mut table);
    table
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

pub fn number_cell(value: f64) -> Cell {
    Cell::new(format_number(value)).set_alignment(CellAlignment::Right)
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

/// Every row of a frame. Float columns are right-aligned and nulls dimmed.
pub fn frame_table(df: &DataFrame) -> Table {
    let mut table = new_table(&df.get_column_names_str());
    for idx in 0..df.height() {
        table.add_row(
            df.get_columns()
                .iter()
                .map(|column| frame_cell(column.get(idx).unwrap_or(AnyValue::Null)))
                .collect::<Vec<_>>(),
        );
    }
    for (idx, column) in df.get_columns().iter().enumerate() {
        if column.dtype() == &DataType::Float64 {
            align_column(&mut table, idx, CellAlignment::Right);
        }
    }
    table
}

fn frame_cell(value: AnyValue<'_>) -> Cell {
    match value {
        AnyValue::Null => dim_cell(""),
        AnyValue::Float64(n) => number_cell(n),
        AnyValue::String(text) => Cell::new(text),
        other => Cell::new(other),
    }
}

/// Label, value and share for every point.
pub fn series_table(series: &ChartSeries) -> Table {
    let mut table = new_table(&["Label", "Value", "Share"]);
    for point in &series.points {
        table.add_row(vec![
            Cell::new(&point.label),
            number_cell(point.value),
            Cell::new(format!("{:.1}%", point.share * 100.0)).set_alignment(CellAlignment::Right),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        number_cell(series.total).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

/// Draws a series the way its chart kind asks for.
pub fn render_series(series: &ChartSeries) -> String {
    if series.is_empty() {
        return "(no data)".to_string();
    }
    match series.kind {
        ChartKind::Bar => bar_lines(series, BAR_WIDTH).join("\n"),
        ChartKind::Line => format!("{}\n{}", sparkline(series), series_table(series)),
        ChartKind::Pie => pie_lines(series).join("\n"),
        ChartKind::Table => series_table(series).to_string(),
    }
}

/// One horizontal bar per point, scaled to the largest value.
///
/// Zero and negative values draw no bar.
pub fn bar_lines(series: &ChartSeries, width: usize) -> Vec<String> {
    let label_width = label_width(series);
    let max = series.max_value();
    series
        .points
        .iter()
        .map(|point| {
            let len = if max > 0.0 && point.value > 0.0 {
                ((point.value / max) * width as f64).round() as usize
            } else {
                0
            };
            format!(
                "{:<label_width$}  {:<width$}  {}",
                point.label,
                "█".repeat(len),
                format_number(point.value)
            )
        })
        .collect()
}

/// One character per point, from lowest to highest value.
pub fn sparkline(series: &ChartSeries) -> String {
    let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let top = SPARK_LEVELS.len() - 1;
    values
        .iter()
        .map(|value| {
            if max > min {
                let level = ((value - min) / (max - min) * top as f64).round() as usize;
                SPARK_LEVELS[level.min(top)]
            } else {
                SPARK_LEVELS[top / 2]
            }
        })
        .collect()
}

/// Each point's share of the total as a percentage.
pub fn pie_lines(series: &ChartSeries) -> Vec<String> {
    let label_width = label_width(series);
    series
        .points
        .iter()
        .map(|point| {
            format!(
                "{:<label_width$}  {:>6.1}%  {}",
                point.label,
                point.share * 100.0,
                format_number(point.value)
            )
        })
        .collect()
}

fn label_width(series: &ChartSeries) -> usize {
    series
        .points
        .iter()
        .map(|p| p.label.chars().count())
        .max()
        .unwrap_or(0)
}
