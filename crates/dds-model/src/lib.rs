pub mod aggregate;
pub mod chart;
pub mod column;
pub mod dashboard;
pub mod error;
pub mod source;
pub mod summary;
pub mod table;

pub use aggregate::{
    AggregateOptions, AggregationMode, AggregationResult, AggregationStats, SortOrder,
};
pub use chart::{ChartDefinition, ChartKind};
pub use column::{ColumnSpec, ColumnType};
pub use dashboard::{Dashboard, GRID_COLUMNS, Widget};
pub use error::{ModelError, Result};
pub use source::{CustomField, DataSource};
pub use summary::SummaryDefinition;
pub use table::{CellValue, Row, Table};
