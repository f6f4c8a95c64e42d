//! Store round trips against a real directory.

use std::fs;

use dds_ingest::import_bytes;
use dds_model::{
    AggregateOptions, ChartDefinition, ChartKind, CustomField, SortOrder, SummaryDefinition, Widget,
};
use dds_store::{Store, StoreError};
use tempfile::TempDir;

const SALES: &[u8] = b"region,product,units\nNorth,Apple,3\nSouth,Pear,5\nNorth,Pear,2\n";

fn summary(source_id: &str, group: &str, value: &str) -> SummaryDefinition {
    SummaryDefinition {
        id: String::new(),
        name: format!("{value} by {group}"),
        source_id: source_id.to_string(),
        group_column: group.to_string(),
        value_column: value.to_string(),
        options: AggregateOptions::default(),
    }
}

fn chart(summary_id: &str) -> ChartDefinition {
    ChartDefinition {
        id: String::new(),
        title: "Units".to_string(),
        summary_id: summary_id.to_string(),
        kind: ChartKind::Bar,
        sort: SortOrder::ValueDesc,
        limit: None,
    }
}

/// Source, summary, chart and a dashboard showing the chart.
fn populated(root: &std::path::Path) -> Store {
    let mut store = Store::new(root);
    let imported = import_bytes(SALES, "sales.csv", None).unwrap();
    let source_id = store.add_source(imported.source).unwrap().id.clone();
    let summary_id = store
        .add_summary(summary(&source_id, "region", "units"))
        .unwrap()
        .id
        .clone();
    let chart_id = store.add_chart(chart(&summary_id)).unwrap().id.clone();
    let dashboard_id = store.add_dashboard("Overview").unwrap().id.clone();
    store.add_widget(&dashboard_id, Widget::new(chart_id)).unwrap();
    store
}

#[test]
fn save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut store = populated(dir.path());
    assert!(store.is_dirty());
    store.save().unwrap();
    assert!(!store.is_dirty());

    for file in [
        "dds.datasources.json",
        "dds.summaries.json",
        "dds.charts.json",
        "dds.dashboards.json",
    ] {
        assert!(dir.path().join(file).exists(), "{file} missing");
    }

    let loaded = Store::load(dir.path()).unwrap();
    assert!(!loaded.is_dirty());
    assert!(loaded.warnings().is_empty());
    assert_eq!(loaded.sources(), store.sources());
    assert_eq!(loaded.summaries(), store.summaries());
    assert_eq!(loaded.charts(), store.charts());
    assert_eq!(loaded.dashboards(), store.dashboards());

    let series = loaded.chart_series("chart-1").unwrap();
    let points: Vec<(&str, f64)> = series
        .points
        .iter()
        .map(|p| (p.label.as_str(), p.value))
        .collect();
    assert_eq!(points, vec![("North", 5.0), ("South", 5.0)]);
}

#[test]
fn ids_continue_after_the_largest() {
    let dir = TempDir::new().unwrap();
    let mut store = populated(dir.path());
    let imported = import_bytes(SALES, "sales.csv", Some("second")).unwrap();
    let second = store.add_source(imported.source).unwrap().id.clone();
    assert_eq!(second, "src-2");

    store.remove_source("src-1").unwrap();
    let imported = import_bytes(SALES, "sales.csv", Some("third")).unwrap();
    assert_eq!(store.add_source(imported.source).unwrap().id, "src-3");
}

#[test]
fn duplicate_names_get_a_suffix_on_add_but_not_on_rename() {
    let dir = TempDir::new().unwrap();
    let mut store = Store::new(dir.path());
    for _ in 0..3 {
        let imported = import_bytes(SALES, "sales.csv", None).unwrap();
        store.add_source(imported.source).unwrap();
    }
    let names: Vec<&str> = store.sources().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["sales", "sales (2)", "sales (3)"]);

    let err = store.rename_source("src-3", "sales").unwrap_err();
    assert!(matches!(err, StoreError::DuplicateName { .. }));
    store.rename_source("src-3", "  archive ").unwrap();
    assert_eq!(store.source("src-3").unwrap().name, "archive");
}

#[test]
fn removing_a_source_cascades() {
    let dir = TempDir::new().unwrap();
    let mut store = populated(dir.path());
    let removed = store.remove_source("src-1").unwrap();
    assert_eq!(removed.summaries, vec!["sum-1"]);
    assert_eq!(removed.charts, vec!["chart-1"]);
    assert_eq!(removed.widgets, 1);

    assert!(store.sources().is_empty());
    assert!(store.summaries().is_empty());
    assert!(store.charts().is_empty());
    assert_eq!(store.dashboards().len(), 1);
    assert!(store.dashboards()[0].widgets.is_empty());
}

#[test]
fn removing_a_chart_drops_its_widgets() {
    let dir = TempDir::new().unwrap();
    let mut store = populated(dir.path());
    let removed = store.remove_chart("chart-1").unwrap();
    assert_eq!(removed.widgets, 1);
    assert_eq!(store.summaries().len(), 1);
}

#[test]
fn references_are_checked() {
    let dir = TempDir::new().unwrap();
    let mut store = populated(dir.path());

    let err = store.add_summary(summary("src-9", "region", "units")).unwrap_err();
    assert!(matches!(err, StoreError::InvalidReference { .. }));
    let err = store.add_summary(summary("src-1", "region", "price")).unwrap_err();
    assert!(matches!(err, StoreError::InvalidReference { .. }));
    let err = store.add_chart(chart("sum-9")).unwrap_err();
    assert!(matches!(err, StoreError::InvalidReference { .. }));
    let err = store
        .add_widget("dash-1", Widget::new("chart-1").at(8, 0).sized(6, 2))
        .unwrap_err();
    assert!(matches!(err, StoreError::Model(_)));
    let err = store.add_widget("dash-9", Widget::new("chart-1")).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn custom_fields_feed_summaries() {
    let dir = TempDir::new().unwrap();
    let mut store = populated(dir.path());
    store
        .add_custom_field("src-1", CustomField::new("double", "units * 2"))
        .unwrap();
    store
        .add_custom_field("src-1", CustomField::new("quad", "double * 2"))
        .unwrap();
    let err = store
        .add_custom_field("src-1", CustomField::new("bad", "nope + 1"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Core(_)));

    let id = store
        .add_summary(summary("src-1", "region", "quad"))
        .unwrap()
        .id
        .clone();
    let result = store.summary_result(&id).unwrap();
    assert_eq!(result.get("North"), Some(20.0));
    assert_eq!(result.get("South"), Some(20.0));

    let err = store.remove_custom_field("src-1", "double").unwrap_err();
    assert!(matches!(err, StoreError::InvalidReference { .. }));
    let err = store.remove_custom_field("src-1", "quad").unwrap_err();
    assert!(matches!(err, StoreError::InvalidReference { .. }));

    store.remove_summary(&id).unwrap();
    store.remove_custom_field("src-1", "quad").unwrap();
    store.remove_custom_field("src-1", "double").unwrap();
    assert!(store.source("src-1").unwrap().custom_fields.is_empty());
}

#[test]
fn corrupt_snapshot_loads_empty_with_warning() {
    let dir = TempDir::new().unwrap();
    let mut store = populated(dir.path());
    store.save().unwrap();
    fs::write(dir.path().join("dds.charts.json"), "not json at all").unwrap();

    let loaded = Store::load(dir.path()).unwrap();
    assert!(loaded.charts().is_empty());
    assert_eq!(loaded.summaries().len(), 1);
    let keys: Vec<&str> = loaded.warnings().iter().map(|w| w.key).collect();
    assert_eq!(keys, vec!["dds.charts", "dds.dashboards"]);
}

#[test]
fn references_into_a_corrupt_snapshot_are_dropped() {
    let dir = TempDir::new().unwrap();
    let mut store = populated(dir.path());
    store.save().unwrap();
    fs::write(dir.path().join("dds.charts.json"), "{ truncated").unwrap();

    let mut loaded = Store::load(dir.path()).unwrap();
    assert!(loaded.dashboards()[0].widgets.is_empty());
    let dropped = &loaded.warnings()[1];
    assert_eq!(dropped.key, "dds.dashboards");
    assert_eq!(dropped.path, dir.path().join("dds.dashboards.json"));
    assert_eq!(dropped.reason, "dropped widgets referring to a missing chart: 1");
    assert!(loaded.is_dirty());

    // The reused id must not bring the old widget back.
    let chart_id = loaded.add_chart(chart("sum-1")).unwrap().id.clone();
    assert_eq!(chart_id, "chart-1");
    assert!(loaded.dashboards()[0].widgets.is_empty());

    loaded.save().unwrap();
    let reloaded = Store::load(dir.path()).unwrap();
    assert!(reloaded.warnings().is_empty());
    assert!(reloaded.dashboards()[0].widgets.is_empty());
    assert_eq!(reloaded.charts().len(), 1);
}

#[test]
fn a_corrupt_source_snapshot_drops_everything_built_on_it() {
    let dir = TempDir::new().unwrap();
    let mut store = populated(dir.path());
    store.save().unwrap();
    fs::write(dir.path().join("dds.datasources.json"), "[1, 2").unwrap();

    let loaded = Store::load(dir.path()).unwrap();
    assert!(loaded.sources().is_empty());
    assert!(loaded.summaries().is_empty());
    assert!(loaded.charts().is_empty());
    assert!(loaded.dashboards()[0].widgets.is_empty());
    let keys: Vec<&str> = loaded.warnings().iter().map(|w| w.key).collect();
    assert_eq!(
        keys,
        vec!["dds.datasources", "dds.summaries", "dds.charts", "dds.dashboards"]
    );
}

#[test]
fn newer_snapshot_is_refused() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("dds.summaries.json"),
        r#"{"schema_version": 7, "items": []}"#,
    )
    .unwrap();
    let err = Store::load(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        StoreError::UnsupportedVersion {
            key: "dds.summaries",
            found: 7,
            ..
        }
    ));
}

#[test]
fn missing_directory_loads_empty() {
    let dir = TempDir::new().unwrap();
    let store = Store::load(dir.path().join("never-created")).unwrap();
    assert!(store.sources().is_empty());
    assert!(store.warnings().is_empty());
}
