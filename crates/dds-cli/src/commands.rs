//! Subcommand handlers.
//!
//! Every handler works on a loaded [`Store`]; [`run`] saves whatever they
//! changed.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use comfy_table::{Cell, CellAlignment};
use dds_core::{
    SummaryTable, aggregate_source, materialize, preview_expression, result_to_dataframe,
    summarize, summary_to_dataframe, write_csv,
};
use dds_ingest::{detect_columns, import_data_source, table_to_dataframe};
use dds_model::{
    AggregateOptions, AggregationResult, ChartDefinition, CustomField, DataSource, SortOrder,
    SummaryDefinition, Widget,
};
use dds_store::{Removed, Store};
use polars::prelude::DataFrame;
use tracing::{info, warn};

use crate::cli::{
    AggregateArgs, ChartCommand, Command, DashboardCommand, FieldCommand, SourceCommand,
    SummaryCommand,
};
use crate::render::{align_column, dim_cell, frame_table, new_table, number_cell, render_series};

/// Loads the store under `root`, runs one command and saves the changes.
pub fn run(command: Command, root: &Path) -> Result<()> {
    let mut store = open_store(root)?;
    match command {
        Command::Source(command) => run_source(&mut store, command),
        Command::Field(command) => run_field(&mut store, command),
        Command::Aggregate(args) => run_aggregate(&store, &args),
        Command::Summary(command) => run_summary(&mut store, command),
        Command::Chart(command) => run_chart(&mut store, command),
        Command::Dashboard(command) => run_dashboard(&mut store, command),
    }?;
    if store.is_dirty() {
        store
            .save()
            .with_context(|| format!("save store at {}", store.root().display()))?;
    }
    Ok(())
}

fn open_store(root: &Path) -> Result<Store> {
    let store =
        Store::load(root).with_context(|| format!("load store at {}", root.display()))?;
    for warning in store.warnings() {
        warn!(
            key = warning.key,
            path = %warning.path.display(),
            reason = %warning.reason,
            "store loaded with a warning"
        );
    }
    Ok(store)
}

fn run_source(store: &mut Store, command: SourceCommand) -> Result<()> {
    match command {
        SourceCommand::Import { path, name } => {
            let imported = import_data_source(&path, name.as_deref())
                .with_context(|| format!("import {}", path.display()))?;
            for issue in &imported.issues {
                eprintln!(
                    "warning: line {} has {} fields, expected {}",
                    issue.line, issue.found, issue.expected
                );
            }
            let source = store.add_source(imported.source)?;
            println!(
                "Imported {} as {} ({} rows, {} columns)",
                source.file_name,
                source.id,
                source.row_count(),
                source.columns.len()
            );
        }
        SourceCommand::List => {
            let mut table = new_table(&["Id", "Name", "File", "Rows", "Columns", "Fields", "Imported"]);
            for source in store.sources() {
                table.add_row(vec![
                    Cell::new(&source.id),
                    Cell::new(&source.name),
                    Cell::new(&source.file_name),
                    Cell::new(source.row_count()),
                    Cell::new(source.columns.len()),
                    Cell::new(source.custom_fields.len()),
                    dim_cell(&source.imported_at),
                ]);
            }
            align_column(&mut table, 3, CellAlignment::Right);
            align_column(&mut table, 4, CellAlignment::Right);
            align_column(&mut table, 5, CellAlignment::Right);
            println!("{table}");
        }
        SourceCommand::Show { id, rows } => {
            let source = store.source(&id)?;
            println!("{} ({})", source.name, source.id);
            println!("File: {}", source.file_name);
            println!("SHA-256: {}", source.content_hash);

            let mut columns = new_table(&["Column", "Type"]);
            for column in &source.columns {
                columns.add_row(vec![Cell::new(&column.name), Cell::new(column.column_type)]);
            }
            for field in &source.custom_fields {
                columns.add_row(vec![
                    Cell::new(&field.name),
                    dim_cell(format!("= {}", field.expression)),
                ]);
            }
            println!("{columns}");

            let frame = preview_frame(source, rows)?;
            println!("{}", frame_table(&frame));
            if frame.height() < source.row_count() {
                println!("Showing {} of {} rows", frame.height(), source.row_count());
            }
        }
        SourceCommand::Remove { id } => {
            let removed = store.remove_source(&id)?;
            println!("Removed data source {id}");
            print_removed(&removed);
        }
        SourceCommand::Rename { id, name } => {
            store.rename_source(&id, &name)?;
            println!("Renamed {id} to {}", store.source(&id)?.name);
        }
    }
    Ok(())
}

fn run_field(store: &mut Store, command: FieldCommand) -> Result<()> {
    match command {
        FieldCommand::Add {
            source,
            name,
            expression,
        } => {
            store
                .add_custom_field(&source, CustomField::new(&name, &expression))
                .with_context(|| format!("add field {name:?}"))?;
            info!(source = %source, field = %name, "added custom field");
            println!("Added field {name} to {source}");
        }
        FieldCommand::Remove { source, name } => {
            store.remove_custom_field(&source, &name)?;
            println!("Removed field {name} from {source}");
        }
        FieldCommand::Check {
            source,
            expression,
            rows,
        } => {
            let table = materialize(store.source(&source)?)?;
            let values = match preview_expression(&table, &expression, rows) {
                Ok(values) => values,
                Err(dds_core::CoreError::InvalidExpression(err)) => {
                    return Err(anyhow!("{}", err.format_with_source(&expression)));
                }
                Err(err) => return Err(err.into()),
            };
            let mut out = new_table(&["Row", "Value"]);
            for (idx, value) in values.iter().enumerate() {
                out.add_row(vec![Cell::new(idx + 1), Cell::new(value)]);
            }
            align_column(&mut out, 0, CellAlignment::Right);
            println!("{out}");
        }
    }
    Ok(())
}

fn run_aggregate(store: &Store, args: &AggregateArgs) -> Result<()> {
    let source = store.source(&args.source)?;
    let options = args.grouping.options();
    match args.value.as_slice() {
        [value] => aggregate_one(source, args, value, options),
        values => aggregate_many(source, args, values, options),
    }
}

fn aggregate_one(
    source: &DataSource,
    args: &AggregateArgs,
    value: &str,
    options: AggregateOptions,
) -> Result<()> {
    let result = aggregate_source(source, &args.group, value, options)?;
    print_result(&result, &args.group, value, args.sort.into(), args.limit);

    if let Some(path) = &args.export {
        let mut df = result_to_dataframe(&result, args.group.trim(), value.trim())?;
        write_csv(&mut df, path).with_context(|| format!("export {}", path.display()))?;
        println!("Exported {} groups to {}", df.height(), path.display());
    }
    Ok(())
}

fn aggregate_many(
    source: &DataSource,
    args: &AggregateArgs,
    values: &[String],
    options: AggregateOptions,
) -> Result<()> {
    let table = materialize(source)?;
    let summary = summarize(&table, &args.group, values, options);
    print_summary_table(&summary, args.limit);

    if let Some(path) = &args.export {
        let mut df = summary_to_dataframe(&summary)?;
        write_csv(&mut df, path).with_context(|| format!("export {}", path.display()))?;
        println!("Exported {} groups to {}", df.height(), path.display());
    }
    Ok(())
}

fn run_summary(store: &mut Store, command: SummaryCommand) -> Result<()> {
    match command {
        SummaryCommand::Create {
            name,
            source,
            group,
            value,
            grouping,
        } => {
            let summary = store.add_summary(SummaryDefinition {
                id: String::new(),
                name,
                source_id: source,
                group_column: group,
                value_column: value,
                options: grouping.options(),
            })?;
            println!("Created summary {} ({})", summary.id, summary.name);
        }
        SummaryCommand::List => {
            let mut table = new_table(&["Id", "Name", "Source", "Group", "Value", "Options"]);
            for summary in store.summaries() {
                table.add_row(vec![
                    Cell::new(&summary.id),
                    Cell::new(&summary.name),
                    Cell::new(&summary.source_id),
                    Cell::new(&summary.group_column),
                    Cell::new(&summary.value_column),
                    dim_cell(option_flags(summary)),
                ]);
            }
            println!("{table}");
        }
        SummaryCommand::Show { id, sort, limit } => {
            let summary = store.summary(&id)?;
            let result = store.summary_result(&id)?;
            println!("{} ({})", summary.name, summary.id);
            print_result(
                &result,
                &summary.group_column,
                &summary.value_column,
                sort.into(),
                limit,
            );
        }
        SummaryCommand::Remove { id } => {
            let removed = store.remove_summary(&id)?;
            println!("Removed summary {id}");
            print_removed(&removed);
        }
    }
    Ok(())
}

fn run_chart(store: &mut Store, command: ChartCommand) -> Result<()> {
    match command {
        ChartCommand::Create {
            title,
            summary,
            kind,
            sort,
            limit,
        } => {
            let chart = store.add_chart(ChartDefinition {
                id: String::new(),
                title,
                summary_id: summary,
                kind: kind.into(),
                sort: sort.into(),
                limit,
            })?;
            println!("Created {} chart {} ({})", chart.kind, chart.id, chart.title);
        }
        ChartCommand::List => {
            let mut table = new_table(&["Id", "Title", "Summary", "Kind", "Limit"]);
            for chart in store.charts() {
                table.add_row(vec![
                    Cell::new(&chart.id),
                    Cell::new(&chart.title),
                    Cell::new(&chart.summary_id),
                    Cell::new(chart.kind),
                    chart.limit.map_or_else(|| dim_cell("-"), Cell::new),
                ]);
            }
            println!("{table}");
        }
        ChartCommand::Show { id } => print_chart(store, &id)?,
        ChartCommand::Remove { id } => {
            let removed = store.remove_chart(&id)?;
            println!("Removed chart {id}");
            print_removed(&removed);
        }
    }
    Ok(())
}

fn run_dashboard(store: &mut Store, command: DashboardCommand) -> Result<()> {
    match command {
        DashboardCommand::Create { name } => {
            let dashboard = store.add_dashboard(&name)?;
            println!("Created dashboard {} ({})", dashboard.id, dashboard.name);
        }
        DashboardCommand::Add {
            dashboard,
            chart,
            x,
            y,
            w,
            h,
        } => {
            let y = match y {
                Some(y) => y,
                None => store.dashboard(&dashboard)?.next_free_row(),
            };
            let index = store.add_widget(&dashboard, Widget::new(&chart).at(x, y).sized(w, h))?;
            println!("Placed {chart} on {dashboard} as widget {index} at ({x}, {y}) size {w}x{h}");
        }
        DashboardCommand::RemoveWidget { dashboard, index } => {
            let widget = store.remove_widget(&dashboard, index)?;
            println!("Removed widget {index} ({}) from {dashboard}", widget.chart_id);
        }
        DashboardCommand::List => {
            let mut table = new_table(&["Id", "Name", "Widgets"]);
            for dashboard in store.dashboards() {
                table.add_row(vec![
                    Cell::new(&dashboard.id),
                    Cell::new(&dashboard.name),
                    Cell::new(dashboard.widgets.len()),
                ]);
            }
            align_column(&mut table, 2, CellAlignment::Right);
            println!("{table}");
        }
        DashboardCommand::Show { id } => {
            let dashboard = store.dashboard(&id)?;
            println!("{} ({})", dashboard.name, dashboard.id);
            for widget in dashboard.widgets_in_reading_order() {
                let index = dashboard
                    .widgets
                    .iter()
                    .position(|w| std::ptr::eq(w, widget))
                    .unwrap_or_default();
                println!();
                println!(
                    "[{index}] at ({}, {}) size {}x{}",
                    widget.x, widget.y, widget.w, widget.h
                );
                print_chart(store, &widget.chart_id)?;
            }
        }
        DashboardCommand::Remove { id } => {
            let dashboard = store.remove_dashboard(&id)?;
            println!(
                "Removed dashboard {id} with {} widgets",
                dashboard.widgets.len()
            );
        }
    }
    Ok(())
}

fn print_chart(store: &Store, id: &str) -> Result<()> {
    let series = store
        .chart_series(id)
        .with_context(|| format!("draw chart {id}"))?;
    println!("{} ({}, {})", series.title, series.kind, series.mode);
    println!("{}", render_series(&series));
    Ok(())
}

fn print_result(
    result: &AggregationResult,
    group: &str,
    value: &str,
    sort: SortOrder,
    limit: Option<usize>,
) {
    let entries = match limit {
        Some(limit) => result.top(sort, limit),
        None => result.sorted(sort),
    };
    let value_header = format!("{} ({})", value.trim(), result.mode);
    let mut table = new_table(&[group.trim(), value_header.as_str()]);
    for (key, value) in &entries {
        table.add_row(vec![Cell::new(key), number_cell(*value)]);
    }
    table.add_row(vec![dim_cell("TOTAL"), number_cell(result.total())]);
    println!("{table}");

    let stats = result.stats;
    if entries.len() < result.len() {
        println!("Showing {} of {} groups", entries.len(), result.len());
    }
    if stats.skipped_rows > 0 {
        println!("{} rows without a group key were skipped", stats.skipped_rows);
    }
    if stats.unparsed_values > 0 || stats.blank_values > 0 {
        println!(
            "{} non-numeric and {} blank values counted as 0",
            stats.unparsed_values, stats.blank_values
        );
    }
}

/// Rows in key order; `--sort` applies to single-value results only.
fn print_summary_table(summary: &SummaryTable, limit: Option<usize>) {
    let headers: Vec<String> = std::iter::once(summary.group_column.clone())
        .chain(
            summary
                .value_columns
                .iter()
                .zip(&summary.modes)
                .map(|(name, mode)| format!("{name} ({mode})")),
        )
        .collect();
    let mut table = new_table(&headers.iter().map(String::as_str).collect::<Vec<_>>());
    let shown = limit.unwrap_or(summary.rows.len()).min(summary.rows.len());
    for row in summary.rows.iter().take(shown) {
        let mut cells = vec![Cell::new(&row.key)];
        cells.extend(row.values.iter().map(|value| number_cell(*value)));
        table.add_row(cells);
    }
    let mut totals = vec![dim_cell("TOTAL")];
    totals.extend(summary.totals().into_iter().map(number_cell));
    table.add_row(totals);
    println!("{table}");
    if shown < summary.rows.len() {
        println!("Showing {shown} of {} groups", summary.rows.len());
    }
}

/// First `rows` rows with custom fields applied, as a typed frame.
fn preview_frame(source: &DataSource, rows: usize) -> Result<DataFrame> {
    let table = materialize(source)?.head(rows);
    let mut specs = source.columns.clone();
    specs.extend(
        detect_columns(&table)
            .into_iter()
            .filter(|spec| source.column(&spec.name).is_none()),
    );
    Ok(table_to_dataframe(&table, &specs)?)
}

fn print_removed(removed: &Removed) {
    if !removed.summaries.is_empty() {
        println!("Also removed summaries: {}", removed.summaries.join(", "));
    }
    if !removed.charts.is_empty() {
        println!("Also removed charts: {}", removed.charts.join(", "));
    }
    if removed.widgets > 0 {
        println!("Also removed {} dashboard widgets", removed.widgets);
    }
}

fn option_flags(summary: &SummaryDefinition) -> String {
    let mut flags = Vec::new();
    if summary.options.normalize_case {
        flags.push("normalize-case");
    }
    if summary.options.fill_down {
        flags.push("fill-down");
    }
    if flags.is_empty() {
        "-".to_string()
    } else {
        flags.join(", ")
    }
}
