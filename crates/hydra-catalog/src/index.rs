use chrono::{DateTime, SecondsFormat, Utc};
use hydra_api::ModelSpec;
use serde::{Deserialize, Serialize};

use crate::loader::CatalogEntry;

pub const INDEX_API_VERSION: &str = "v1";

/// All catalog entries merged into one document for publishing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogIndex {
    pub api_version: String,
    /// Sorted by `metadata.name`.
    pub entries: Vec<ModelSpec>,
    /// RFC 3339 UTC timestamp, second precision.
    pub generated: String,
}

impl CatalogIndex {
    pub fn build(entries: &[CatalogEntry], generated_at: DateTime<Utc>) -> Self {
        let mut models: Vec<ModelSpec> = entries.iter().map(|e| e.model.clone()).collect();
        models.sort_by(|a, b| a.metadata.name.cmp(&b.metadata.name));
        Self {
            api_version: INDEX_API_VERSION.to_string(),
            entries: models,
            generated: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    pub fn find(&self, name: &str) -> Option<&ModelSpec> {
        self.entries
            .iter()
            .find(|m| m.metadata.name.as_deref() == Some(name))
    }
}
