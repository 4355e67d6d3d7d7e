use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dataset::ColumnCatalog;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    Scatter,
    Box,
}

/// One axis range override. Either side may be open ("auto").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Validated, sanitized user intent for one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotRequest {
    pub kind: PlotKind,
    /// Y column for scatter; value column for box.
    pub primary_column: String,
    /// X column; scatter only.
    pub x_column: Option<String>,
    /// Categorical color/grouping column; `None` means no grouping.
    pub group_column: Option<String>,
    pub log_x: bool,
    pub log_y: bool,
    pub x_bounds: Option<AxisBounds>,
    pub y_bounds: Option<AxisBounds>,
}

/// Validate and sanitize raw form fields against the loaded schema.
///
/// Recognized fields: `y`, `x`, `group`, `log_x`, `log_y`, `x_min`,
/// `x_max`, `y_min`, `y_max`. Rules apply in order, first failure wins;
/// everything past column existence degrades softly instead of failing.
pub fn build_request(
    params: &HashMap<String, String>,
    catalog: &ColumnCatalog,
    kind: PlotKind,
) -> Result<PlotRequest, ValidationError> {
    let field = |name: &str| params.get(name).map(|v| v.trim()).unwrap_or("");

    // 1. Primary column must exist; box additionally requires numeric.
    let primary = field("y").to_string();
    if !catalog.all_columns.contains(&primary) {
        return Err(ValidationError::MissingColumn { column: primary });
    }
    if kind == PlotKind::Box && !catalog.numeric_columns.contains(&primary) {
        return Err(ValidationError::NotNumeric { column: primary });
    }

    // 2. Scatter pairs the primary column with an x column.
    let x_column = match kind {
        PlotKind::Scatter => {
            let x = field("x").to_string();
            if !catalog.all_columns.contains(&x) {
                return Err(ValidationError::MissingColumn { column: x });
            }
            Some(x)
        }
        PlotKind::Box => None,
    };

    // 3. An unknown group column is dropped, not rejected: a column
    //    removed between requests must not hard-fail the page.
    let group = field("group");
    let group_column = if group.is_empty() || !catalog.all_columns.contains(&group.to_string()) {
        None
    } else {
        Some(group.to_string())
    };

    // 4. Range fields parse independently; an unparsable bound stays open.
    let x_bounds = parse_bounds(field("x_min"), field("x_max"));
    let y_bounds = parse_bounds(field("y_min"), field("y_max"));

    // 5. Log flags; scatter only.
    let (log_x, log_y) = match kind {
        PlotKind::Scatter => (parse_flag(field("log_x")), parse_flag(field("log_y"))),
        PlotKind::Box => (false, false),
    };

    Ok(PlotRequest {
        kind,
        primary_column: primary,
        x_column,
        group_column,
        log_x,
        log_y,
        x_bounds: match kind {
            PlotKind::Scatter => x_bounds,
            PlotKind::Box => None,
        },
        y_bounds: match kind {
            PlotKind::Scatter => y_bounds,
            PlotKind::Box => None,
        },
    })
}

/// Default form fields for a first visit with no saved request.
///
/// Scatter: x = first column, y = second if present. Box: y = first
/// numeric column, falling back to the first column overall so the
/// not-numeric error surfaces instead of silently charting wrong data.
pub fn default_params(catalog: &ColumnCatalog, kind: PlotKind) -> HashMap<String, String> {
    let mut params = HashMap::new();
    match kind {
        PlotKind::Scatter => {
            if let Some(first) = catalog.all_columns.first() {
                params.insert("x".to_string(), first.clone());
            }
            if let Some(second) = catalog.all_columns.get(1) {
                params.insert("y".to_string(), second.clone());
            }
        }
        PlotKind::Box => {
            let y = catalog
                .numeric_columns
                .first()
                .or_else(|| catalog.all_columns.first());
            if let Some(y) = y {
                params.insert("y".to_string(), y.clone());
            }
        }
    }
    params
}

fn parse_bounds(min: &str, max: &str) -> Option<AxisBounds> {
    let min = min.parse::<f64>().ok();
    let max = max.parse::<f64>().ok();
    if min.is_none() && max.is_none() {
        None
    } else {
        Some(AxisBounds { min, max })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_catalog() -> ColumnCatalog {
        ColumnCatalog {
            all_columns: vec!["age".into(), "score".into(), "group".into()],
            numeric_columns: vec!["age".into(), "score".into()],
        }
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_scatter_with_grouping() {
        let req = build_request(
            &params(&[("y", "score"), ("x", "age"), ("group", "group")]),
            &make_catalog(),
            PlotKind::Scatter,
        )
        .unwrap();
        assert_eq!(req.primary_column, "score");
        assert_eq!(req.x_column.as_deref(), Some("age"));
        assert_eq!(req.group_column.as_deref(), Some("group"));
        assert!(!req.log_x && !req.log_y);
    }

    #[test]
    fn test_missing_primary_column() {
        let err = build_request(
            &params(&[("y", "weight"), ("x", "age")]),
            &make_catalog(),
            PlotKind::Scatter,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingColumn {
                column: "weight".into()
            }
        );
    }

    #[test]
    fn test_box_rejects_text_column() {
        let err = build_request(&params(&[("y", "group")]), &make_catalog(), PlotKind::Box)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotNumeric {
                column: "group".into()
            }
        );
    }

    #[test]
    fn test_unknown_group_silently_dropped() {
        let req = build_request(
            &params(&[("y", "score"), ("x", "age"), ("group", "removed")]),
            &make_catalog(),
            PlotKind::Scatter,
        )
        .unwrap();
        assert_eq!(req.group_column, None);
    }

    #[test]
    fn test_unparsable_bound_stays_open() {
        let req = build_request(
            &params(&[("y", "score"), ("x", "age"), ("x_min", "abc"), ("x_max", "10")]),
            &make_catalog(),
            PlotKind::Scatter,
        )
        .unwrap();
        assert_eq!(
            req.x_bounds,
            Some(AxisBounds {
                min: None,
                max: Some(10.0)
            })
        );
    }

    #[test]
    fn test_no_parsable_bounds_is_no_range() {
        let req = build_request(
            &params(&[("y", "score"), ("x", "age"), ("y_min", ""), ("y_max", "oops")]),
            &make_catalog(),
            PlotKind::Scatter,
        )
        .unwrap();
        assert_eq!(req.y_bounds, None);
    }

    #[test]
    fn test_checkbox_flag_coercion() {
        let req = build_request(
            &params(&[("y", "score"), ("x", "age"), ("log_y", "on"), ("log_x", "no")]),
            &make_catalog(),
            PlotKind::Scatter,
        )
        .unwrap();
        assert!(req.log_y);
        assert!(!req.log_x);
    }

    #[test]
    fn test_default_params_scatter() {
        let defaults = default_params(&make_catalog(), PlotKind::Scatter);
        assert_eq!(defaults.get("x").map(String::as_str), Some("age"));
        assert_eq!(defaults.get("y").map(String::as_str), Some("score"));
    }

    #[test]
    fn test_default_params_box_prefers_numeric() {
        let catalog = ColumnCatalog {
            all_columns: vec!["name".into(), "score".into()],
            numeric_columns: vec!["score".into()],
        };
        let defaults = default_params(&catalog, PlotKind::Box);
        assert_eq!(defaults.get("y").map(String::as_str), Some("score"));
    }

    #[test]
    fn test_default_params_empty_catalog() {
        let catalog = ColumnCatalog {
            all_columns: vec![],
            numeric_columns: vec![],
        };
        assert!(default_params(&catalog, PlotKind::Scatter).is_empty());
        assert!(default_params(&catalog, PlotKind::Box).is_empty());
    }

    #[test]
    fn test_single_column_scatter_default_fails_validation() {
        let catalog = ColumnCatalog {
            all_columns: vec!["x".into()],
            numeric_columns: vec!["x".into()],
        };
        let defaults = default_params(&catalog, PlotKind::Scatter);
        let err = build_request(&defaults, &catalog, PlotKind::Scatter).unwrap_err();
        assert!(matches!(err, ValidationError::MissingColumn { .. }));
    }
}
