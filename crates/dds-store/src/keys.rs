//! Fixed storage keys.

pub const DATASOURCES: &str = "dds.datasources";
pub const SUMMARIES: &str = "dds.summaries";
pub const CHARTS: &str = "dds.charts";
pub const DASHBOARDS: &str = "dds.dashboards";

pub const ALL: [&str; 4] = [DATASOURCES, SUMMARIES, CHARTS, DASHBOARDS];

/// File name a key is persisted under.
pub fn file_name(key: &str) -> String {
    format!("{key}.json")
}
