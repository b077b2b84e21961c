//! Tooling for a model catalog: a directory tree of
//! `models/{provider}/{model_id}/metadata.yaml` ModelSpec documents.

pub mod check;
pub mod enrich;
pub mod error;
pub mod hub;
pub mod index;
pub mod layout;
pub mod loader;
pub mod providers;
pub mod scaffold;
pub mod summary;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_support;

pub use check::{check_sources, MissingSource, SourceFailure, SourceReport};
pub use enrich::{enrich_entries, EnrichReport, EnrichedModel, TokenizerConfig};
pub use error::{CatalogError, Result};
pub use hub::{HttpHubClient, HubClient};
pub use index::CatalogIndex;
pub use layout::{check_layout, CatalogPath, LayoutViolation};
pub use loader::{save_model, Catalog, CatalogEntry};
pub use providers::{ProviderDirectory, ProviderInfo};
pub use scaffold::{scaffold, write_scaffold, Scaffold};
pub use summary::{readme_summary, summarize_readme};
pub use validate::{validate_files, FileReport};
