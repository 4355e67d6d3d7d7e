// Library exports for mobiplot

pub mod builder;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod request;
pub mod session;
pub mod source;
pub mod spec;

pub use builder::{build, BuiltPlot};
pub use dataset::{catalog, ColumnCatalog, Dataset};
pub use error::{BuildError, DataLoadError, RangeWarning, ResolveError, ValidationError};
pub use request::{build_request, default_params, PlotKind, PlotRequest};
pub use session::{resolve_active_dataset, MemorySessionStore, SessionStore};
pub use source::DatasetReference;
pub use spec::PlotSpec;
