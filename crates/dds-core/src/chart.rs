//! Chart series built from aggregation results.

use dds_model::{AggregationMode, AggregationResult, ChartDefinition, ChartKind};

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    /// Fraction of the series total, 0 when the total is 0.
    pub share: f64,
}

/// The points a chart draws, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub title: String,
    pub kind: ChartKind,
    pub mode: AggregationMode,
    pub points: Vec<ChartPoint>,
    /// Sum of the point values.
    pub total: f64,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Largest point value, used to scale bars.
    pub fn max_value(&self) -> f64 {
        self.points.iter().map(|p| p.value).fold(0.0, f64::max)
    }
}

/// Applies the chart's sort order and limit to `result`.
///
/// Shares are computed over the points that remain after the limit, so the
/// shares of a pie chart add up to one.
pub fn build_series(chart: &ChartDefinition, result: &AggregationResult) -> ChartSeries {
    let entries = match chart.limit {
        Some(limit) => result.top(chart.sort, limit),
        None => result.sorted(chart.sort),
    };
    let total: f64 = entries.iter().map(|(_, value)| value).sum();
    let points = entries
        .into_iter()
        .map(|(label, value)| ChartPoint {
            label,
            value,
            share: if total == 0.0 { 0.0 } else { value / total },
        })
        .collect();

    ChartSeries {
        title: chart.title.clone(),
        kind: chart.kind,
        mode: result.mode,
        points,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dds_model::{AggregationStats, SortOrder};

    fn chart(sort: SortOrder, limit: Option<usize>) -> ChartDefinition {
        ChartDefinition {
            id: "chart-1".to_string(),
            title: "Revenue".to_string(),
            summary_id: "sum-1".to_string(),
            kind: ChartKind::Pie,
            sort,
            limit,
        }
    }

    fn result(values: &[(&str, f64)]) -> AggregationResult {
        AggregationResult {
            values: values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            mode: AggregationMode::Sum,
            stats: AggregationStats::default(),
        }
    }

    #[test]
    fn sorted_and_limited() {
        let series = build_series(
            &chart(SortOrder::ValueDesc, Some(2)),
            &result(&[("a", 1.0), ("b", 3.0), ("c", 6.0)]),
        );
        let labels: Vec<&str> = series.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["c", "b"]);
        assert_eq!(series.total, 9.0);
        assert!((series.points[0].share - 6.0 / 9.0).abs() < 1e-12);
        assert_eq!(series.max_value(), 6.0);
    }

    #[test]
    fn zero_total_has_zero_shares() {
        let series = build_series(
            &chart(SortOrder::KeyAsc, None),
            &result(&[("a", 0.0), ("b", 0.0)]),
        );
        assert!(series.points.iter().all(|p| p.share == 0.0));
    }

    #[test]
    fn empty_result() {
        let series = build_series(&chart(SortOrder::KeyAsc, None), &AggregationResult::empty());
        assert!(series.is_empty());
        assert_eq!(series.total, 0.0);
        assert_eq!(series.mode, AggregationMode::Count);
    }
}
