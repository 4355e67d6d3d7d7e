use std::collections::HashMap;

use tracing::debug;

use crate::dataset::{catalog, ColumnCatalog, Dataset};
use crate::error::ResolveError;
use crate::loader;
use crate::request::PlotRequest;
use crate::source::{DatasetReference, KEY_REFERENCE_KIND, KEY_REFERENCE_VALUE};

pub const KEY_LAST_REQUEST: &str = "last_plot_request";

/// Per-session key-value storage. The transport decides how it travels
/// (cookie, server-side map); the core only reads and writes strings.
/// Last write wins; no transactional guarantees.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-process store for tests and the CLI.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Record a new active reference, replacing any prior one.
pub fn set_active_reference(store: &mut dyn SessionStore, reference: &DatasetReference) {
    store.set(KEY_REFERENCE_KIND, reference.kind());
    store.set(KEY_REFERENCE_VALUE, &reference.value());
    debug!(kind = reference.kind(), "active dataset reference replaced");
}

/// Read back the active reference, if a recognizable one is stored.
pub fn active_reference(store: &dyn SessionStore) -> Option<DatasetReference> {
    let kind = store.get(KEY_REFERENCE_KIND)?;
    let value = store.get(KEY_REFERENCE_VALUE)?;
    DatasetReference::from_session_parts(&kind, &value)
}

/// Single entry point the rendering layer calls before building a page:
/// load the session's active dataset and derive its column catalog.
pub fn resolve_active_dataset(
    store: &dyn SessionStore,
) -> Result<(Dataset, ColumnCatalog), ResolveError> {
    let reference = active_reference(store).ok_or(ResolveError::NoActiveDataset)?;
    let dataset = loader::load(&reference)?;
    let catalog = catalog(&dataset);
    Ok((dataset, catalog))
}

/// Persist the last successfully applied request.
pub fn save_request(store: &mut dyn SessionStore, request: &PlotRequest) {
    if let Ok(encoded) = serde_json::to_string(request) {
        store.set(KEY_LAST_REQUEST, &encoded);
    }
}

/// Recall the last applied request. Absent or corrupt entries read as
/// `None`; a broken saved request must never fail a page.
pub fn last_request(store: &dyn SessionStore) -> Option<PlotRequest> {
    let encoded = store.get(KEY_LAST_REQUEST)?;
    serde_json::from_str(&encoded).ok()
}
