//! The owned collection store.

use std::path::{Path, PathBuf};

use dds_core::{ChartSeries, CoreError, build_series, materialize, run_summary};
use dds_model::{
    AggregationResult, ChartDefinition, CustomField, Dashboard, DataSource, SummaryDefinition,
    Widget,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::dirty::DirtyTracker;
use crate::error::{Result, StoreError};
use crate::io::{LoadWarning, read_snapshot, write_snapshot};
use crate::keys;

const SOURCE_PREFIX: &str = "src";
const SUMMARY_PREFIX: &str = "sum";
const CHART_PREFIX: &str = "chart";
const DASHBOARD_PREFIX: &str = "dash";

/// Items removed along with the one that was asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removed {
    pub summaries: Vec<String>,
    pub charts: Vec<String>,
    /// Widgets dropped from dashboards.
    pub widgets: usize,
}

/// Data sources, summaries, charts and dashboards rooted at one directory.
///
/// Changes stay in memory until [`Store::save`] is called.
#[derive(Debug)]
pub struct Store {
    root: PathBuf,
    sources: Vec<DataSource>,
    summaries: Vec<SummaryDefinition>,
    charts: Vec<ChartDefinition>,
    dashboards: Vec<Dashboard>,
    warnings: Vec<LoadWarning>,
    dirty: DirtyTracker,
}

impl Store {
    /// An empty store that will save under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sources: Vec::new(),
            summaries: Vec::new(),
            charts: Vec::new(),
            dashboards: Vec::new(),
            warnings: Vec::new(),
            dirty: DirtyTracker::new(),
        }
    }

    /// Loads every collection under `root`.
    ///
    /// Missing snapshots start empty. Unreadable ones also start empty and
    /// are listed in [`Store::warnings`]. Items left pointing at something
    /// that did not load are dropped, with a warning per collection.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self::new(root);
        store.sources = store.load_key(keys::DATASOURCES)?;
        store.summaries = store.load_key(keys::SUMMARIES)?;
        store.charts = store.load_key(keys::CHARTS)?;
        store.dashboards = store.load_key(keys::DASHBOARDS)?;
        store.drop_dangling();
        tracing::info!(
            root = %store.root.display(),
            sources = store.sources.len(),
            summaries = store.summaries.len(),
            charts = store.charts.len(),
            dashboards = store.dashboards.len(),
            warnings = store.warnings.len(),
            "loaded store"
        );
        Ok(store)
    }

    fn load_key<T: DeserializeOwned>(&mut self, key: &'static str) -> Result<Vec<T>> {
        let (items, warning) = read_snapshot(&self.root, key)?.into_items();
        self.warnings.extend(warning);
        Ok(items)
    }

    // Summaries, charts and widgets are checked in that order so a
    // missing source drops everything built on it.
    fn drop_dangling(&mut self) {
        let sources = &self.sources;
        let before = self.summaries.len();
        self.summaries
            .retain(|summary| sources.iter().any(|s| s.id == summary.source_id));
        let dropped = before - self.summaries.len();
        self.note_dropped(keys::SUMMARIES, dropped, "summaries", "data source");

        let summaries = &self.summaries;
        let before = self.charts.len();
        self.charts
            .retain(|chart| summaries.iter().any(|s| s.id == chart.summary_id));
        let dropped = before - self.charts.len();
        self.note_dropped(keys::CHARTS, dropped, "charts", "summary");

        let charts = &self.charts;
        let mut dropped = 0;
        for dashboard in &mut self.dashboards {
            let before = dashboard.widgets.len();
            dashboard
                .widgets
                .retain(|widget| charts.iter().any(|c| c.id == widget.chart_id));
            dropped += before - dashboard.widgets.len();
        }
        self.note_dropped(keys::DASHBOARDS, dropped, "widgets", "chart");
    }

    fn note_dropped(&mut self, key: &'static str, count: usize, what: &str, target: &str) {
        if count == 0 {
            return;
        }
        let path = self.root.join(keys::file_name(key));
        tracing::warn!(
            key,
            count,
            path = %path.display(),
            "dropped {what} with a missing {target}"
        );
        self.warnings.push(LoadWarning {
            key,
            path,
            reason: format!("dropped {what} referring to a missing {target}: {count}"),
        });
        self.dirty.mark_dirty(key);
    }

    /// Writes every collection with unsaved changes.
    pub fn save(&mut self) -> Result<()> {
        for key in keys::ALL {
            if !self.dirty.is_key_dirty(key) {
                continue;
            }
            match key {
                keys::DATASOURCES => self.write_key(key, &self.sources)?,
                keys::SUMMARIES => self.write_key(key, &self.summaries)?,
                keys::CHARTS => self.write_key(key, &self.charts)?,
                _ => self.write_key(key, &self.dashboards)?,
            }
            self.dirty.save_complete(key);
        }
        tracing::info!(root = %self.root.display(), "saved store");
        Ok(())
    }

    fn write_key<T: Serialize>(&self, key: &'static str, items: &[T]) -> Result<()> {
        write_snapshot(&self.root, key, items)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether anything changed since the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    /// Snapshots that could not be read during [`Store::load`].
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    // ---------------------------------------------------------------------
    // Data sources
    // ---------------------------------------------------------------------

    /// Adds an imported source, assigning its id.
    ///
    /// A name already in use gets a numeric suffix.
    pub fn add_source(&mut self, mut source: DataSource) -> Result<&DataSource> {
        let name = required_name("data source", &source.name)?;
        if let Some(existing) = self
            .sources
            .iter()
            .find(|s| !source.content_hash.is_empty() && s.content_hash == source.content_hash)
        {
            tracing::warn!(
                existing = %existing.id,
                name = %existing.name,
                "importing content identical to an existing data source"
            );
        }
        source.id = next_id(SOURCE_PREFIX, self.sources.iter().map(|s| s.id.as_str()))?;
        source.name = self.unique_source_name(&name);
        tracing::info!(id = %source.id, name = %source.name, rows = source.row_count(), "added data source");
        self.sources.push(source);
        self.dirty.mark_dirty(keys::DATASOURCES);
        let last = self.sources.len() - 1;
        Ok(&self.sources[last])
    }

    fn unique_source_name(&self, name: &str) -> String {
        let taken = |candidate: &str| self.sources.iter().any(|s| s.name == candidate);
        if !taken(name) {
            return name.to_string();
        }
        (2..)
            .map(|n| format!("{name} ({n})"))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| name.to_string())
    }

    pub fn source(&self, id: &str) -> Result<&DataSource> {
        self.sources
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("data source", id))
    }

    fn source_mut(&mut self, id: &str) -> Result<&mut DataSource> {
        self.sources
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("data source", id))
    }

    pub fn sources(&self) -> &[DataSource] {
        &self.sources
    }

    pub fn rename_source(&mut self, id: &str, name: &str) -> Result<()> {
        let name = required_name("data source", name)?;
        if self.sources.iter().any(|s| s.name == name && s.id != id) {
            return Err(StoreError::DuplicateName {
                kind: "data source",
                name,
            });
        }
        let source = self.source_mut(id)?;
        tracing::info!(id, from = %source.name, to = %name, "renamed data source");
        source.name = name;
        self.dirty.mark_dirty(keys::DATASOURCES);
        Ok(())
    }

    /// Removes a source with its summaries, their charts and the widgets
    /// showing those charts.
    pub fn remove_source(&mut self, id: &str) -> Result<Removed> {
        let idx = self
            .sources
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("data source", id))?;
        self.sources.remove(idx);
        self.dirty.mark_dirty(keys::DATASOURCES);

        let summary_ids: Vec<String> = self
            .summaries
            .iter()
            .filter(|s| s.source_id == id)
            .map(|s| s.id.clone())
            .collect();
        let mut removed = Removed::default();
        for summary_id in summary_ids {
            removed.merge(self.remove_summary(&summary_id)?);
            removed.summaries.push(summary_id);
        }
        tracing::info!(id, summaries = removed.summaries.len(), charts = removed.charts.len(), "removed data source");
        Ok(removed)
    }

    // ---------------------------------------------------------------------
    // Custom fields
    // ---------------------------------------------------------------------

    /// Adds a custom field after checking that it compiles against the
    /// source's columns and earlier fields.
    pub fn add_custom_field(&mut self, source_id: &str, field: CustomField) -> Result<()> {
        let field = CustomField::new(field.name.trim(), field.expression);
        let source = self.source_mut(source_id)?;
        let mut fields = source.custom_fields.clone();
        fields.push(field);
        dds_core::apply_custom_fields(&source.table, &fields)?;
        source.custom_fields = fields;
        self.dirty.mark_dirty(keys::DATASOURCES);
        Ok(())
    }

    /// Removes a custom field that no other field or summary uses.
    pub fn remove_custom_field(&mut self, source_id: &str, name: &str) -> Result<()> {
        if let Some(summary) = self
            .summaries
            .iter()
            .find(|s| s.source_id == source_id && (s.group_column == name || s.value_column == name))
        {
            return Err(StoreError::InvalidReference {
                reason: format!("custom field {name:?} is used by summary {}", summary.id),
            });
        }

        let source = self.source_mut(source_id)?;
        let idx = source
            .custom_fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| StoreError::not_found("custom field", name))?;
        let mut fields = source.custom_fields.clone();
        fields.remove(idx);
        if let Err(err) = dds_core::apply_custom_fields(&source.table, &fields) {
            return Err(match err {
                CoreError::Expression { field, .. } => StoreError::InvalidReference {
                    reason: format!("custom field {field:?} depends on {name:?}"),
                },
                other => other.into(),
            });
        }
        source.custom_fields = fields;
        self.dirty.mark_dirty(keys::DATASOURCES);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Summaries
    // ---------------------------------------------------------------------

    /// Adds a summary, assigning its id.
    ///
    /// The source must exist and both columns must be present once its
    /// custom fields are applied.
    pub fn add_summary(&mut self, mut summary: SummaryDefinition) -> Result<&SummaryDefinition> {
        summary.name = required_name("summary", &summary.name)?;
        summary.group_column = summary.group_column.trim().to_string();
        summary.value_column = summary.value_column.trim().to_string();

        let source = self.source(&summary.source_id).map_err(|_| {
            StoreError::InvalidReference {
                reason: format!("data source {} does not exist", summary.source_id),
            }
        })?;
        let table = materialize(source)?;
        for column in [&summary.group_column, &summary.value_column] {
            if !table.has_column(column) {
                return Err(StoreError::InvalidReference {
                    reason: format!("data source {} has no column {column:?}", source.id),
                });
            }
        }

        summary.id = next_id(SUMMARY_PREFIX, self.summaries.iter().map(|s| s.id.as_str()))?;
        tracing::info!(id = %summary.id, source = %summary.source_id, "added summary");
        self.summaries.push(summary);
        self.dirty.mark_dirty(keys::SUMMARIES);
        let last = self.summaries.len() - 1;
        Ok(&self.summaries[last])
    }

    pub fn summary(&self, id: &str) -> Result<&SummaryDefinition> {
        self.summaries
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("summary", id))
    }

    pub fn summaries(&self) -> &[SummaryDefinition] {
        &self.summaries
    }

    /// Removes a summary with its charts and their widgets.
    pub fn remove_summary(&mut self, id: &str) -> Result<Removed> {
        let idx = self
            .summaries
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("summary", id))?;
        self.summaries.remove(idx);
        self.dirty.mark_dirty(keys::SUMMARIES);

        let chart_ids: Vec<String> = self
            .charts
            .iter()
            .filter(|c| c.summary_id == id)
            .map(|c| c.id.clone())
            .collect();
        let mut removed = Removed::default();
        for chart_id in chart_ids {
            removed.merge(self.remove_chart(&chart_id)?);
            removed.charts.push(chart_id);
        }
        Ok(removed)
    }

    /// Runs a saved summary against its source.
    pub fn summary_result(&self, id: &str) -> Result<AggregationResult> {
        let summary = self.summary(id)?;
        let source = self.source(&summary.source_id)?;
        Ok(run_summary(summary, source)?)
    }

    // ---------------------------------------------------------------------
    // Charts
    // ---------------------------------------------------------------------

    pub fn add_chart(&mut self, mut chart: ChartDefinition) -> Result<&ChartDefinition> {
        chart.title = required_name("chart", &chart.title)?;
        if self.summary(&chart.summary_id).is_err() {
            return Err(StoreError::InvalidReference {
                reason: format!("summary {} does not exist", chart.summary_id),
            });
        }
        chart.id = next_id(CHART_PREFIX, self.charts.iter().map(|c| c.id.as_str()))?;
        tracing::info!(id = %chart.id, summary = %chart.summary_id, kind = %chart.kind, "added chart");
        self.charts.push(chart);
        self.dirty.mark_dirty(keys::CHARTS);
        let last = self.charts.len() - 1;
        Ok(&self.charts[last])
    }

    pub fn chart(&self, id: &str) -> Result<&ChartDefinition> {
        self.charts
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("chart", id))
    }

    pub fn charts(&self) -> &[ChartDefinition] {
        &self.charts
    }

    /// Removes a chart and every widget showing it.
    pub fn remove_chart(&mut self, id: &str) -> Result<Removed> {
        let idx = self
            .charts
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("chart", id))?;
        self.charts.remove(idx);
        self.dirty.mark_dirty(keys::CHARTS);

        let mut widgets = 0;
        for dashboard in &mut self.dashboards {
            let before = dashboard.widgets.len();
            dashboard.widgets.retain(|w| w.chart_id != id);
            widgets += before - dashboard.widgets.len();
        }
        if widgets > 0 {
            self.dirty.mark_dirty(keys::DASHBOARDS);
        }
        Ok(Removed {
            widgets,
            ..Removed::default()
        })
    }

    /// The points a saved chart draws.
    pub fn chart_series(&self, id: &str) -> Result<ChartSeries> {
        let chart = self.chart(id)?;
        let result = self.summary_result(&chart.summary_id)?;
        Ok(build_series(chart, &result))
    }

    // ---------------------------------------------------------------------
    // Dashboards
    // ---------------------------------------------------------------------

    pub fn add_dashboard(&mut self, name: &str) -> Result<&Dashboard> {
        let name = required_name("dashboard", name)?;
        let id = next_id(DASHBOARD_PREFIX, self.dashboards.iter().map(|d| d.id.as_str()))?;
        tracing::info!(%id, %name, "added dashboard");
        self.dashboards.push(Dashboard::new(id, name));
        self.dirty.mark_dirty(keys::DASHBOARDS);
        let last = self.dashboards.len() - 1;
        Ok(&self.dashboards[last])
    }

    pub fn dashboard(&self, id: &str) -> Result<&Dashboard> {
        self.dashboards
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::not_found("dashboard", id))
    }

    fn dashboard_mut(&mut self, id: &str) -> Result<&mut Dashboard> {
        self.dashboards
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::not_found("dashboard", id))
    }

    pub fn dashboards(&self) -> &[Dashboard] {
        &self.dashboards
    }

    pub fn remove_dashboard(&mut self, id: &str) -> Result<Dashboard> {
        let idx = self
            .dashboards
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| StoreError::not_found("dashboard", id))?;
        self.dirty.mark_dirty(keys::DASHBOARDS);
        Ok(self.dashboards.remove(idx))
    }

    /// Places a chart on a dashboard and returns the widget's index.
    pub fn add_widget(&mut self, dashboard_id: &str, widget: Widget) -> Result<usize> {
        if self.chart(&widget.chart_id).is_err() {
            return Err(StoreError::InvalidReference {
                reason: format!("chart {} does not exist", widget.chart_id),
            });
        }
        widget.validate()?;
        let dashboard = self.dashboard_mut(dashboard_id)?;
        dashboard.widgets.push(widget);
        let index = dashboard.widgets.len() - 1;
        self.dirty.mark_dirty(keys::DASHBOARDS);
        Ok(index)
    }

    pub fn remove_widget(&mut self, dashboard_id: &str, index: usize) -> Result<Widget> {
        let dashboard = self.dashboard_mut(dashboard_id)?;
        if index >= dashboard.widgets.len() {
            return Err(StoreError::not_found("widget", &index.to_string()));
        }
        let widget = dashboard.widgets.remove(index);
        self.dirty.mark_dirty(keys::DASHBOARDS);
        Ok(widget)
    }
}

impl Removed {
    fn merge(&mut self, other: Removed) {
        self.summaries.extend(other.summaries);
        self.charts.extend(other.charts);
        self.widgets += other.widgets;
    }
}

fn required_name(kind: &'static str, name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::BlankName { kind });
    }
    Ok(name.to_string())
}

/// `<prefix>-<n>` with `n` one past the largest id in use.
fn next_id<'a>(prefix: &'static str, ids: impl Iterator<Item = &'a str>) -> Result<String> {
    let max = ids
        .filter_map(|id| id.strip_prefix(prefix)?.strip_prefix('-')?.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    let next = max
        .checked_add(1)
        .ok_or(StoreError::IdsExhausted { prefix })?;
    Ok(format!("{prefix}-{next}"))
}
