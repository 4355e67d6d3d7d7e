use std::path::Path;

use tracing::debug;

use crate::dataset::Dataset;
use crate::error::DataLoadError;
use crate::source::DatasetReference;

/// Resolve a reference into an in-memory dataset.
///
/// The single blocking I/O step of the pipeline. No retries, no caching;
/// a failed fetch surfaces immediately for the caller to resubmit.
pub fn load(reference: &DatasetReference) -> Result<Dataset, DataLoadError> {
    match reference {
        DatasetReference::LocalFile { path } | DatasetReference::ExtractedTable { path } => {
            load_local(path)
        }
        DatasetReference::RemoteCsv { url } => load_remote(url),
    }
}

fn load_local(path: &Path) -> Result<Dataset, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| DataLoadError::Parse(format!("failed to read {}: {}", path.display(), e)))?;
    let dataset = parse_csv(&content)?;
    debug!(
        path = %path.display(),
        rows = dataset.row_count(),
        columns = dataset.columns().len(),
        "loaded local dataset"
    );
    Ok(dataset)
}

fn load_remote(url: &str) -> Result<Dataset, DataLoadError> {
    // The URL was normalized at ingestion time; fetch it verbatim.
    let response = reqwest::blocking::get(url)
        .map_err(|e| DataLoadError::Network(e.to_string()))?
        .error_for_status()
        .map_err(|e| DataLoadError::Network(e.to_string()))?;
    let body = response
        .text()
        .map_err(|e| DataLoadError::Network(e.to_string()))?;
    let dataset = parse_csv(&body)?;
    debug!(
        url,
        rows = dataset.row_count(),
        columns = dataset.columns().len(),
        "loaded remote dataset"
    );
    Ok(dataset)
}

/// Parse delimited text into a dataset. The first record is the header
/// row; ragged data rows are a parse failure.
pub fn parse_csv(content: &str) -> Result<Dataset, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataLoadError::Parse(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| DataLoadError::Parse(e.to_string()))?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    Dataset::new(headers, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let ds = parse_csv("x,y\n1,10\n2,20\n").unwrap();
        assert_eq!(ds.columns(), &["x".to_string(), "y".to_string()]);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.numeric_cell(1, 1), Some(20.0));
    }

    #[test]
    fn test_parse_header_only() {
        let ds = parse_csv("a,b,c\n").unwrap();
        assert_eq!(ds.columns().len(), 3);
        assert_eq!(ds.row_count(), 0);
    }

    #[test]
    fn test_parse_ragged_is_error() {
        let err = parse_csv("a,b\n1,2\n3\n").unwrap_err();
        assert!(matches!(err, DataLoadError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let reference = DatasetReference::local_file("/nonexistent/definitely-missing.csv");
        let err = load(&reference).unwrap_err();
        assert!(matches!(err, DataLoadError::NotFound { .. }));
    }

    #[test]
    fn test_quoted_fields() {
        let ds = parse_csv("name,value\n\"Smith, Jane\",3\n").unwrap();
        assert_eq!(ds.cell(0, 0), Some("Smith, Jane"));
        assert!(ds.is_numeric(1));
    }
}
