use std::path::PathBuf;

/// Session keys under which the active reference is persisted.
pub const KEY_REFERENCE_KIND: &str = "data_reference_kind";
pub const KEY_REFERENCE_VALUE: &str = "data_reference_value";

/// Where the active dataset lives and how it was produced.
///
/// Exactly one reference is active per session; ingestion handlers replace
/// it wholesale. The variants only record a location, never data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetReference {
    /// Direct file upload, stored on local disk.
    LocalFile { path: PathBuf },
    /// Published spreadsheet, normalized to a direct CSV export URL.
    RemoteCsv { url: String },
    /// OCR / photo-correction output, materialized as CSV on temp storage.
    ExtractedTable { path: PathBuf },
}

impl DatasetReference {
    pub fn local_file(path: impl Into<PathBuf>) -> Self {
        DatasetReference::LocalFile { path: path.into() }
    }

    /// Build a remote reference, normalizing spreadsheet share links to
    /// their CSV export form. The loader relies on this happening exactly
    /// once, here.
    pub fn remote_csv(url: &str) -> Self {
        DatasetReference::RemoteCsv {
            url: normalize_sheet_url(url),
        }
    }

    pub fn extracted_table(path: impl Into<PathBuf>) -> Self {
        DatasetReference::ExtractedTable { path: path.into() }
    }

    /// Tag stored under [`KEY_REFERENCE_KIND`].
    pub fn kind(&self) -> &'static str {
        match self {
            DatasetReference::LocalFile { .. } => "local_file",
            DatasetReference::RemoteCsv { .. } => "remote_csv",
            DatasetReference::ExtractedTable { .. } => "extracted_table",
        }
    }

    /// Location stored under [`KEY_REFERENCE_VALUE`].
    pub fn value(&self) -> String {
        match self {
            DatasetReference::LocalFile { path } | DatasetReference::ExtractedTable { path } => {
                path.display().to_string()
            }
            DatasetReference::RemoteCsv { url } => url.clone(),
        }
    }

    /// Rebuild a reference from its stored parts. Unknown kinds yield
    /// `None` so a stale or foreign session entry reads as "no dataset".
    pub fn from_session_parts(kind: &str, value: &str) -> Option<Self> {
        match kind {
            "local_file" => Some(DatasetReference::LocalFile { path: value.into() }),
            "remote_csv" => Some(DatasetReference::RemoteCsv {
                url: value.to_string(),
            }),
            "extracted_table" => Some(DatasetReference::ExtractedTable { path: value.into() }),
            _ => None,
        }
    }
}

/// Rewrite a published-spreadsheet share link into its direct CSV export
/// form. URLs that don't match a known share pattern pass through as-is.
pub fn normalize_sheet_url(url: &str) -> String {
    if url.contains("/edit#gid=") {
        url.replace("/edit#gid=", "/export?format=csv&gid=")
    } else if url.contains("/view#gid=") {
        url.replace("/view#gid=", "/export?format=csv&gid=")
    } else {
        url.to_string()
    }
}
