use std::fmt;

use serde::{Deserialize, Serialize};

use crate::aggregate::SortOrder;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
    Table,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
            ChartKind::Table => "table",
        };
        f.write_str(label)
    }
}

/// A chart drawn from a saved summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDefinition {
    pub id: String,
    pub title: String,
    pub summary_id: String,
    #[serde(default)]
    pub kind: ChartKind,
    #[serde(default)]
    pub sort: SortOrder,
    /// Keep only the first N points after sorting.
    #[serde(default)]
    pub limit: Option<usize>,
}
