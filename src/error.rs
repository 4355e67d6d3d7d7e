use serde::Serialize;
use std::path::PathBuf;

/// Failures while resolving a dataset reference into rows.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("dataset file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to fetch remote dataset: {0}")]
    Network(String),

    #[error("malformed table: {0}")]
    Parse(String),
}

/// User-supplied plot parameters rejected against the loaded schema.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("column '{column}' not found in dataset")]
    MissingColumn { column: String },

    #[error("column '{column}' is not numeric")]
    NotNumeric { column: String },
}

/// A previously saved request no longer matches the loaded dataset.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("saved parameters reference column '{column}', which is no longer in the dataset")]
    StaleRequest { column: String },
}

/// Failure to produce the active dataset for a session.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No reference has been ingested yet; callers should redirect to an
    /// ingestion entry point rather than render an error.
    #[error("no active dataset in session")]
    NoActiveDataset,

    #[error(transparent)]
    Load(#[from] DataLoadError),
}

/// Non-fatal adjustment applied while building a plot. The chart is still
/// produced; the transport layer may surface the message next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RangeWarning {
    /// A requested log scale was downgraded to linear because the axis
    /// carries values that are not strictly positive.
    LogDowngraded { axis: Axis },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeWarning::LogDowngraded { axis } => {
                let name = match axis {
                    Axis::X => "x",
                    Axis::Y => "y",
                };
                write!(f, "log scale on {name} axis downgraded to linear (non-positive values present)")
            }
        }
    }
}
