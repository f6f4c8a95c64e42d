//! Conversion of loaded tables into Polars frames for previews.

use dds_model::{ColumnSpec, ColumnType, Table};
use polars::prelude::*;

use crate::error::Result;

/// Builds a `DataFrame` with one column per table column.
///
/// `Number` columns become `Float64` (unparseable cells are null); every
/// other column is kept as `String`, with blank cells as null. Columns without
/// a spec are treated as `String`.
pub fn table_to_dataframe(table: &Table, columns: &[ColumnSpec]) -> Result<DataFrame> {
    let mut frame_columns = Vec::with_capacity(table.columns.len());
    for name in &table.columns {
        let column_type = columns
            .iter()
            .find(|spec| &spec.name == name)
            .map_or(ColumnType::String, |spec| spec.column_type);
        let column = match column_type {
            ColumnType::Number => {
                let values: Vec<Option<f64>> = table
                    .column_values(name)
                    .map(dds_model::CellValue::as_number)
                    .collect();
                Series::new(name.as_str().into(), values).into_column()
            }
            ColumnType::Date | ColumnType::String => {
                let values: Vec<Option<String>> = table
                    .column_values(name)
                    .map(|cell| (!cell.is_blank()).then(|| cell.as_text().into_owned()))
                    .collect();
                Series::new(name.as_str().into(), values).into_column()
            }
        };
        frame_columns.push(column);
    }
    Ok(DataFrame::new(frame_columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::detect_columns;
    use crate::read::parse_csv;

    #[test]
    fn test_table_to_dataframe() {
        let parsed = parse_csv(b"region,amount\nNorth,\"1.200\"\nSouth,x\n,5\n", "mem").unwrap();
        let columns = vec![
            ColumnSpec::new("region", ColumnType::String),
            ColumnSpec::new("amount", ColumnType::Number),
        ];
        let df = table_to_dataframe(&parsed.table, &columns).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 2);

        let amount = df.column("amount").unwrap().f64().unwrap();
        assert_eq!(amount.get(0), Some(1200.0));
        assert_eq!(amount.get(1), None);
        assert_eq!(amount.get(2), Some(5.0));

        let region = df.column("region").unwrap().str().unwrap();
        assert_eq!(region.get(0), Some("North"));
        assert_eq!(region.get(2), None);
    }

    #[test]
    fn test_detected_columns_keep_order() {
        let parsed = parse_csv(b"b,a\n1,x\n2,y\n", "mem").unwrap();
        let columns = detect_columns(&parsed.table);
        let df = table_to_dataframe(&parsed.table, &columns).unwrap();
        let names: Vec<&str> = df.get_column_names().into_iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(df.column("b").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("a").unwrap().dtype(), &DataType::String);
    }
}
