//! Dashboards and widget placement.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Width of the dashboard grid in columns.
pub const GRID_COLUMNS: u32 = 12;

/// Placement of a chart on the dashboard grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    pub chart_id: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Widget {
    /// Half-width widget at the origin.
    pub fn new(chart_id: impl Into<String>) -> Self {
        Self {
            chart_id: chart_id.into(),
            x: 0,
            y: 0,
            w: GRID_COLUMNS / 2,
            h: 4,
        }
    }

    pub fn at(mut self, x: u32, y: u32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn sized(mut self, w: u32, h: u32) -> Self {
        self.w = w;
        self.h = h;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.w == 0 || self.h == 0 {
            return Err(ModelError::InvalidLayout {
                reason: "width and height must be at least 1".to_string(),
            });
        }
        let right = self.x.saturating_add(self.w);
        if right > GRID_COLUMNS {
            return Err(ModelError::InvalidLayout {
                reason: format!("x + w = {right} exceeds the {GRID_COLUMNS}-column grid"),
            });
        }
        Ok(())
    }

    fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

impl Dashboard {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            widgets: Vec::new(),
        }
    }

    /// First grid row below every placed widget.
    pub fn next_free_row(&self) -> u32 {
        self.widgets.iter().map(Widget::bottom).max().unwrap_or(0)
    }

    /// Widgets ordered top-to-bottom, then left-to-right.
    pub fn widgets_in_reading_order(&self) -> Vec<&Widget> {
        let mut widgets: Vec<&Widget> = self.widgets.iter().collect();
        widgets.sort_by_key(|w| (w.y, w.x));
        widgets
    }
}
