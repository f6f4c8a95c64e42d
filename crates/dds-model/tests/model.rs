//! Tests for dds-model serialisation shapes.

use dds_model::{
    AggregateOptions, CellValue, ChartDefinition, ChartKind, DataSource, Row, SortOrder, Table,
};

#[test]
fn cell_values_serialize_untagged() {
    let row: Row = [
        ("name", CellValue::Text("Apple".to_string())),
        ("price", CellValue::Number(1.5)),
        ("note", CellValue::Empty),
    ]
    .into_iter()
    .collect();
    let json = serde_json::to_string(&row).expect("serialize row");
    assert_eq!(json, r#"{"name":"Apple","note":null,"price":1.5}"#);

    let round: Row = serde_json::from_str(&json).expect("deserialize row");
    assert_eq!(round, row);
}

#[test]
fn data_source_defaults_custom_fields() {
    let json = r#"{
        "id": "src-1",
        "name": "Sales",
        "file_name": "sales.csv",
        "content_hash": "abc",
        "imported_at": "2024-01-01T00:00:00+00:00",
        "columns": [{"name": "region", "column_type": "string"}],
        "table": {"columns": ["region"], "rows": [{"region": "North"}]}
    }"#;
    let source: DataSource = serde_json::from_str(json).expect("deserialize source");
    assert!(source.custom_fields.is_empty());
    assert_eq!(source.row_count(), 1);
    assert_eq!(
        source.table.rows[0].get("region"),
        &CellValue::Text("North".to_string())
    );
    assert!(source.column("region").is_some());
    assert!(source.column("missing").is_none());
}

#[test]
fn chart_defaults() {
    let json = r#"{"id": "chart-1", "title": "Revenue", "summary_id": "sum-1"}"#;
    let chart: ChartDefinition = serde_json::from_str(json).expect("deserialize chart");
    assert_eq!(chart.kind, ChartKind::Bar);
    assert_eq!(chart.sort, SortOrder::KeyAsc);
    assert_eq!(chart.limit, None);

    let options: AggregateOptions = serde_json::from_str("{}").expect("deserialize options");
    assert_eq!(options, AggregateOptions::default());
}

#[test]
fn sort_order_uses_snake_case() {
    let json = serde_json::to_string(&SortOrder::ValueDesc).expect("serialize order");
    assert_eq!(json, r#""value_desc""#);
}

#[test]
fn table_serializes_columns_in_source_order() {
    let mut table = Table::new(vec!["z".to_string(), "a".to_string()]);
    table.push_row([("z", "1"), ("a", "2")].into_iter().collect());
    let value = serde_json::to_value(&table).expect("serialize table");
    assert_eq!(value["columns"], serde_json::json!(["z", "a"]));
}
