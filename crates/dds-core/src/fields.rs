//! Custom-field materialisation.

use dds_expr::{Value, compile};
use dds_model::{
    AggregateOptions, AggregationResult, CustomField, DataSource, SummaryDefinition, Table,
};

use crate::aggregate::aggregate;
use crate::error::{CoreError, Result};

/// Returns a copy of `table` with one column appended per custom field.
///
/// Fields are applied in order and each is compiled against the columns
/// present at that point, so a field may reference the fields before it.
pub fn apply_custom_fields(table: &Table, fields: &[CustomField]) -> Result<Table> {
    let mut out = table.clone();
    for field in fields {
        let name = field.name.trim();
        if name.is_empty() {
            return Err(CoreError::BlankFieldName);
        }
        if out.has_column(name) {
            return Err(CoreError::FieldNameCollision {
                name: name.to_string(),
            });
        }
        let expr = compile(&field.expression, out.columns.as_slice()).map_err(|source| {
            CoreError::Expression {
                field: name.to_string(),
                source,
            }
        })?;
        let values = out
            .rows
            .iter()
            .map(|row| expr.evaluate(row).into_cell())
            .collect();
        out.add_column(name, values)?;
        tracing::debug!(field = name, rows = out.len(), "materialised custom field");
    }
    Ok(out)
}

/// The source's table with its custom fields applied.
pub fn materialize(source: &DataSource) -> Result<Table> {
    apply_custom_fields(&source.table, &source.custom_fields)
}

/// Evaluates an expression against the first `limit` rows of a materialised
/// source without storing it.
pub fn preview_expression(table: &Table, expression: &str, limit: usize) -> Result<Vec<Value>> {
    let expr = compile(expression, table.columns.as_slice())?;
    Ok(table
        .rows
        .iter()
        .take(limit)
        .map(|row| expr.evaluate(row))
        .collect())
}

/// Runs a saved summary against its source.
pub fn run_summary(summary: &SummaryDefinition, source: &DataSource) -> Result<AggregationResult> {
    let table = materialize(source)?;
    Ok(aggregate(
        &table,
        &summary.group_column,
        &summary.value_column,
        summary.options,
    ))
}

/// Aggregates a source directly, with custom fields available as columns.
pub fn aggregate_source(
    source: &DataSource,
    group_column: &str,
    value_column: &str,
    options: AggregateOptions,
) -> Result<AggregationResult> {
    let table = materialize(source)?;
    Ok(aggregate(&table, group_column, value_column, options))
}
