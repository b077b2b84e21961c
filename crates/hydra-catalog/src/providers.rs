use std::collections::BTreeMap;

use hydra_api::v1alpha1::{Link, LocalizedText};
use serde::{Deserialize, Serialize};

use crate::loader::CatalogEntry;

/// Presentation data shared by every model of one provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderInfo {
    pub icon: String,
    pub links: Vec<Link>,
    pub name: LocalizedText,
}

/// Provider data harvested from an existing catalog, used to fill in new
/// entries consistently.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderDirectory {
    pub providers: BTreeMap<String, ProviderInfo>,
    /// Lowercased Hugging Face organisation -> provider id.
    pub mappings: BTreeMap<String, String>,
}

impl ProviderDirectory {
    /// The first non-empty icon, link list and name seen for a provider win.
    pub fn collect(entries: &[CatalogEntry]) -> Self {
        let mut dir = Self::default();
        for entry in entries {
            let descriptor = &entry.model.spec.descriptor;
            let provider_id = &descriptor.provider.id;

            if provider_id.is_empty() {
                continue;
            }
            if let Some(org) = entry.model.spec.source.huggingface().and_then(|r| r.org()) {
                dir.mappings
                    .insert(org.to_lowercase(), provider_id.clone());
            }

            let info = dir.providers.entry(provider_id.clone()).or_default();
            if info.icon.is_empty() && !descriptor.icon.src.is_empty() {
                info.icon = descriptor.icon.src.clone();
            }
            if info.links.is_empty() && !descriptor.links.is_empty() {
                info.links = descriptor.links.clone();
            }
            if info.name.en_us.is_empty() && !descriptor.provider.name.en_us.is_empty() {
                info.name = descriptor.provider.name.clone();
            }
        }
        tracing::debug!(
            providers = dir.providers.len(),
            mappings = dir.mappings.len(),
            "collected provider directory"
        );
        dir
    }

    /// Provider id for a Hugging Face organisation; the lowercased org when unmapped.
    pub fn provider_for_org(&self, org: &str) -> String {
        let key = org.to_lowercase();
        self.mappings
            .get(&key)
            .filter(|id| !id.is_empty())
            .cloned()
            .unwrap_or(key)
    }

    pub fn get(&self, provider_id: &str) -> Option<&ProviderInfo> {
        self.providers.get(provider_id)
    }
}
