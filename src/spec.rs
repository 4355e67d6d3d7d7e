use serde::Serialize;

use crate::request::PlotKind;

/// Fully resolved, ready-to-render chart description. Everything the
/// rendering layer needs is baked in; nothing here is user-configurable
/// beyond what [`crate::request::PlotRequest`] carried.
#[derive(Debug, Clone, Serialize)]
pub struct PlotSpec {
    pub kind: PlotKind,
    pub series: Vec<Series>,
    pub x_axis: AxisConfig,
    pub y_axis: AxisConfig,
    pub layout: Layout,
    pub interaction: Interaction,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Series {
    Scatter(ScatterSeries),
    Box(BoxSeries),
}

impl Series {
    pub fn name(&self) -> &str {
        match self {
            Series::Scatter(s) => &s.name,
            Series::Box(s) => &s.name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScatterSeries {
    /// Legend key: group value, or the y column name when ungrouped.
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoxSeries {
    /// Group value, or the value column name when ungrouped.
    pub name: String,
    pub stats: BoxStats,
}

/// Five-number summary plus outliers. Whiskers are the extreme data
/// values within 1.5×IQR of Q1/Q3; outliers lie beyond the fences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub whisker_low: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    Linear,
    Log,
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisConfig {
    pub title: String,
    pub scale: AxisScale,
    /// Explicit override per side; `None` on a side means auto-scale to
    /// the rendered data's extent.
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub show_grid: bool,
    pub show_line: bool,
    /// Pan/zoom locked on this axis.
    pub fixed_range: bool,
}

impl AxisConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            scale: AxisScale::Linear,
            min: None,
            max: None,
            show_grid: true,
            show_line: true,
            fixed_range: true,
        }
    }
}

/// Fixed small-screen layout. These values are behavioral constants of
/// the system, identical for every chart of a given kind.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub height: u32,
    pub margin: Margin,
    pub font_size: u32,
    pub autosize: bool,
    pub show_legend: bool,
    pub legend: Option<LegendConfig>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

/// Horizontal legend above the plot area, right-aligned.
#[derive(Debug, Clone, Serialize)]
pub struct LegendConfig {
    pub orientation: &'static str,
    pub y_anchor: &'static str,
    pub y: f64,
    pub x_anchor: &'static str,
    pub x: f64,
}

impl LegendConfig {
    pub fn horizontal_top() -> Self {
        Self {
            orientation: "h",
            y_anchor: "bottom",
            y: 1.02,
            x_anchor: "right",
            x: 1.0,
        }
    }
}

/// Interaction policy for touch screens: everything off except hover.
#[derive(Debug, Clone, Serialize)]
pub struct Interaction {
    pub hover: bool,
    pub drag: bool,
    pub scroll_zoom: bool,
    pub double_click: bool,
    pub box_select: bool,
    pub mode_bar: bool,
    pub responsive: bool,
}

pub const PLOT_HEIGHT: u32 = 400;
pub const FONT_SIZE: u32 = 12;

/// Margins differ only in top inset (box charts carry a title row).
pub fn margin_for(kind: PlotKind) -> Margin {
    match kind {
        PlotKind::Scatter => Margin {
            l: 20,
            r: 20,
            t: 40,
            b: 40,
        },
        PlotKind::Box => Margin {
            l: 20,
            r: 20,
            t: 50,
            b: 40,
        },
    }
}

pub fn mobile_layout(kind: PlotKind, grouped: bool) -> Layout {
    Layout {
        height: PLOT_HEIGHT,
        margin: margin_for(kind),
        font_size: FONT_SIZE,
        autosize: true,
        show_legend: grouped,
        legend: grouped.then(LegendConfig::horizontal_top),
    }
}

pub fn mobile_interaction() -> Interaction {
    Interaction {
        hover: true,
        drag: false,
        scroll_zoom: false,
        double_click: false,
        box_select: false,
        mode_bar: false,
        responsive: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_constants() {
        let layout = mobile_layout(PlotKind::Scatter, false);
        assert_eq!(layout.height, 400);
        assert_eq!(layout.margin.t, 40);
        assert!(!layout.show_legend);
        assert!(layout.legend.is_none());

        let layout = mobile_layout(PlotKind::Box, true);
        assert_eq!(layout.margin.t, 50);
        assert!(layout.show_legend);
        assert!(layout.legend.is_some());
    }

    #[test]
    fn test_interaction_hover_only() {
        let i = mobile_interaction();
        assert!(i.hover);
        assert!(!i.drag && !i.scroll_zoom && !i.double_click && !i.box_select && !i.mode_bar);
    }
}
