use tracing::warn;

use crate::dataset::{ColumnCatalog, Dataset};
use crate::error::{Axis, BuildError, RangeWarning};
use crate::request::{PlotKind, PlotRequest};
use crate::spec::{
    mobile_interaction, mobile_layout, AxisConfig, AxisScale, BoxSeries, BoxStats, PlotSpec,
    ScatterSeries, Series,
};

/// A successfully built chart plus any non-fatal adjustments made along
/// the way.
#[derive(Debug, Clone)]
pub struct BuiltPlot {
    pub spec: PlotSpec,
    pub warnings: Vec<RangeWarning>,
}

/// Turn a validated request into a renderable chart description.
///
/// Column existence is re-checked against the dataset: a session can hold
/// a request saved against a source that has since changed shape.
pub fn build(
    dataset: &Dataset,
    _catalog: &ColumnCatalog,
    request: &PlotRequest,
) -> Result<BuiltPlot, BuildError> {
    let primary_idx = resolve_column(dataset, &request.primary_column)?;
    let group_idx = match &request.group_column {
        Some(name) => Some(resolve_column(dataset, name)?),
        None => None,
    };

    match request.kind {
        PlotKind::Scatter => {
            let x_name = request.x_column.as_deref().unwrap_or("");
            let x_idx = resolve_column(dataset, x_name)?;
            build_scatter(dataset, request, x_idx, primary_idx, group_idx)
        }
        PlotKind::Box => {
            if !dataset.is_numeric(primary_idx) {
                // The column survived a source change but lost its numeric
                // shape; the saved request no longer applies.
                return Err(BuildError::StaleRequest {
                    column: request.primary_column.clone(),
                });
            }
            build_box(dataset, request, primary_idx, group_idx)
        }
    }
}

fn resolve_column(dataset: &Dataset, name: &str) -> Result<usize, BuildError> {
    dataset
        .column_index(name)
        .ok_or_else(|| BuildError::StaleRequest {
            column: name.to_string(),
        })
}

fn build_scatter(
    dataset: &Dataset,
    request: &PlotRequest,
    x_idx: usize,
    y_idx: usize,
    group_idx: Option<usize>,
) -> Result<BuiltPlot, BuildError> {
    // One series per distinct group value, in first-occurrence order.
    let mut series: Vec<ScatterSeries> = Vec::new();

    for row in 0..dataset.row_count() {
        let (Some(x), Some(y)) = (
            dataset.numeric_cell(row, x_idx),
            dataset.numeric_cell(row, y_idx),
        ) else {
            continue;
        };

        let key = match group_idx {
            Some(idx) => match dataset.cell(row, idx) {
                Some(value) => value.to_string(),
                None => continue,
            },
            None => request.primary_column.clone(),
        };

        match series.iter().position(|s| s.name == key) {
            Some(i) => {
                series[i].x.push(x);
                series[i].y.push(y);
            }
            None => series.push(ScatterSeries {
                name: key,
                x: vec![x],
                y: vec![y],
            }),
        }
    }

    let mut warnings = Vec::new();
    let x_scale = resolve_scale(
        request.log_x,
        Axis::X,
        series.iter().flat_map(|s| s.x.iter().copied()),
        &mut warnings,
    );
    let y_scale = resolve_scale(
        request.log_y,
        Axis::Y,
        series.iter().flat_map(|s| s.y.iter().copied()),
        &mut warnings,
    );

    let mut x_axis = AxisConfig::new(request.x_column.as_deref().unwrap_or(""));
    x_axis.scale = x_scale;
    if let Some(bounds) = request.x_bounds {
        x_axis.min = bounds.min;
        x_axis.max = bounds.max;
    }

    let mut y_axis = AxisConfig::new(request.primary_column.clone());
    y_axis.scale = y_scale;
    if let Some(bounds) = request.y_bounds {
        y_axis.min = bounds.min;
        y_axis.max = bounds.max;
    }

    let grouped = group_idx.is_some();
    Ok(BuiltPlot {
        spec: PlotSpec {
            kind: PlotKind::Scatter,
            series: series.into_iter().map(Series::Scatter).collect(),
            x_axis,
            y_axis,
            layout: mobile_layout(PlotKind::Scatter, grouped),
            interaction: mobile_interaction(),
        },
        warnings,
    })
}

fn build_box(
    dataset: &Dataset,
    request: &PlotRequest,
    value_idx: usize,
    group_idx: Option<usize>,
) -> Result<BuiltPlot, BuildError> {
    // Collect values per group, first-occurrence order. Rows with a
    // missing group value or missing value cell drop out of the chart.
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();

    for row in 0..dataset.row_count() {
        let Some(value) = dataset.numeric_cell(row, value_idx) else {
            continue;
        };
        let key = match group_idx {
            Some(idx) => match dataset.cell(row, idx) {
                Some(g) => g.to_string(),
                None => continue,
            },
            None => request.primary_column.clone(),
        };
        match groups.iter().position(|(name, _)| *name == key) {
            Some(i) => groups[i].1.push(value),
            None => groups.push((key, vec![value])),
        }
    }

    let series: Vec<Series> = groups
        .into_iter()
        .map(|(name, values)| {
            Series::Box(BoxSeries {
                stats: summarize(values),
                name,
            })
        })
        .collect();

    let grouped = group_idx.is_some();
    let x_axis = AxisConfig::new(request.group_column.as_deref().unwrap_or(""));
    let y_axis = AxisConfig::new(request.primary_column.clone());

    Ok(BuiltPlot {
        spec: PlotSpec {
            kind: PlotKind::Box,
            series,
            x_axis,
            y_axis,
            layout: mobile_layout(PlotKind::Box, grouped),
            interaction: mobile_interaction(),
        },
        warnings: Vec::new(),
    })
}

/// Log scale only survives when every plotted value on the axis is
/// strictly positive; otherwise it quietly becomes linear and the
/// downgrade is reported.
fn resolve_scale<I>(
    log_requested: bool,
    axis: Axis,
    mut values: I,
    warnings: &mut Vec<RangeWarning>,
) -> AxisScale
where
    I: Iterator<Item = f64>,
{
    if !log_requested {
        return AxisScale::Linear;
    }
    if values.any(|v| v <= 0.0) {
        warn!(?axis, "log scale downgraded to linear");
        warnings.push(RangeWarning::LogDowngraded { axis });
        AxisScale::Linear
    } else {
        AxisScale::Log
    }
}

/// Distribution summary for one box: quartiles, whiskers at the extreme
/// data within 1.5×IQR fences, outliers beyond them.
fn summarize(mut values: Vec<f64>) -> BoxStats {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let q1 = percentile(&values, 0.25);
    let median = percentile(&values, 0.50);
    let q3 = percentile(&values, 0.75);
    let iqr = q3 - q1;

    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    let whisker_low = values
        .iter()
        .copied()
        .find(|&v| v >= lower_fence)
        .unwrap_or(q1);
    let whisker_high = values
        .iter()
        .copied()
        .rev()
        .find(|&v| v <= upper_fence)
        .unwrap_or(q3);

    let outliers = values
        .iter()
        .copied()
        .filter(|&v| v < lower_fence || v > upper_fence)
        .collect();

    BoxStats {
        whisker_low,
        q1,
        median,
        q3,
        whisker_high,
        outliers,
    }
}

/// Linear-interpolated percentile over sorted data.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted[0];
    }

    let rank = p * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = rank - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}
