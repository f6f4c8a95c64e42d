use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateOptions;

/// A saved aggregation: group one column of a source, total another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryDefinition {
    pub id: String,
    pub name: String,
    pub source_id: String,
    pub group_column: String,
    pub value_column: String,
    #[serde(default)]
    pub options: AggregateOptions,
}
