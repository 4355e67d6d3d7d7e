use crate::error::DataLoadError;

/// Inferred kind of a column. Anything that is not uniformly numeric
/// (dates, categories, free text) is `Text` for plotting purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}

/// A fully materialized table for one request's processing.
///
/// Re-derived from its source on every access; never cached across
/// requests, since source files can change out of band.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    kinds: Vec<ColumnKind>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Build a dataset from headers and string rows, rejecting ragged rows
    /// and inferring per-column kinds.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, DataLoadError> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(DataLoadError::Parse(format!(
                    "row {} has {} values, expected {}",
                    i + 1,
                    row.len(),
                    columns.len()
                )));
            }
        }
        let kinds = infer_kinds(&columns, &rows);
        Ok(Self {
            columns,
            kinds,
            rows,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn is_numeric(&self, index: usize) -> bool {
        self.kinds.get(index) == Some(&ColumnKind::Numeric)
    }

    /// Cell content at (row, column), with empty-after-trim treated as
    /// missing.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        let value = self.rows.get(row)?.get(column)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Numeric cell value, `None` when missing or unparsable.
    pub fn numeric_cell(&self, row: usize, column: usize) -> Option<f64> {
        self.cell(row, column)?.parse::<f64>().ok()
    }
}

/// A column is numeric iff every non-empty cell parses as a real number
/// (locale-free, `.` separator). Empty cells are missing and don't count.
fn infer_kinds(columns: &[String], rows: &[Vec<String>]) -> Vec<ColumnKind> {
    (0..columns.len())
        .map(|col| {
            let numeric = rows.iter().all(|row| {
                let cell = row[col].trim();
                cell.is_empty() || cell.parse::<f64>().is_ok()
            });
            if numeric {
                ColumnKind::Numeric
            } else {
                ColumnKind::Text
            }
        })
        .collect()
}

/// Column-name index derived from a loaded dataset, driving parameter
/// validation and UI defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCatalog {
    pub all_columns: Vec<String>,
    pub numeric_columns: Vec<String>,
}

/// Derive the catalog. Pure and total; an empty dataset yields empty
/// sequences, which downstream default selection must tolerate.
pub fn catalog(dataset: &Dataset) -> ColumnCatalog {
    let all_columns = dataset.columns().to_vec();
    let numeric_columns = all_columns
        .iter()
        .enumerate()
        .filter(|(i, _)| dataset.is_numeric(*i))
        .map(|(_, name)| name.clone())
        .collect();
    ColumnCatalog {
        all_columns,
        numeric_columns,
    }
}
