//! Catalog directory conventions.
//!
//! Every model lives at `models/{provider}/{model_id}/metadata.yaml`, where
//! the directories mirror `spec.descriptor.provider.id` and `metadata.name`.

use std::path::{Component, Path, PathBuf};

use hydra_api::ModelSpec;
use thiserror::Error;

pub const MODELS_DIR: &str = "models";
pub const METADATA_FILE: &str = "metadata.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutViolation {
    #[error("expected models/{{provider}}/{{model_id}}/metadata.yaml")]
    BadPath,
    #[error("provider directory {0:?} may only contain [a-z0-9-_]")]
    BadProviderDir(String),
    #[error("model directory {0:?} may only contain [a-z0-9-_.]")]
    BadModelDir(String),
    #[error("directory name ({dir}) doesn't match metadata.name ({name})")]
    NameMismatch { dir: String, name: String },
    #[error("provider directory ({dir}) doesn't match spec.descriptor.provider.id ({id})")]
    ProviderMismatch { dir: String, id: String },
}

/// The two directory names a metadata path encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPath {
    pub provider: String,
    pub model_id: String,
}

impl CatalogPath {
    /// Parse a path relative to the catalog root.
    pub fn parse(relative: &Path) -> Result<Self, LayoutViolation> {
        let parts: Vec<&str> = relative
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<_>>()
            .ok_or(LayoutViolation::BadPath)?;

        let [models, provider, model_id, file] = parts.as_slice() else {
            return Err(LayoutViolation::BadPath);
        };
        if *models != MODELS_DIR || *file != METADATA_FILE {
            return Err(LayoutViolation::BadPath);
        }
        if !is_slug(provider, false) {
            return Err(LayoutViolation::BadProviderDir(provider.to_string()));
        }
        if !is_slug(model_id, true) {
            return Err(LayoutViolation::BadModelDir(model_id.to_string()));
        }

        Ok(Self {
            provider: provider.to_string(),
            model_id: model_id.to_string(),
        })
    }

    pub fn to_path(&self) -> PathBuf {
        Path::new(MODELS_DIR)
            .join(&self.provider)
            .join(&self.model_id)
            .join(METADATA_FILE)
    }

    /// Check the directories against the document they hold.
    pub fn check(&self, model: &ModelSpec) -> Result<(), LayoutViolation> {
        let name = model.metadata.name.as_deref().unwrap_or_default();
        if self.model_id != name {
            return Err(LayoutViolation::NameMismatch {
                dir: self.model_id.clone(),
                name: name.to_string(),
            });
        }
        let id = &model.spec.descriptor.provider.id;
        if &self.provider != id {
            return Err(LayoutViolation::ProviderMismatch {
                dir: self.provider.clone(),
                id: id.clone(),
            });
        }
        Ok(())
    }
}

fn is_slug(s: &str, allow_dot: bool) -> bool {
    !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_' || (allow_dot && c == '.')
        })
}

/// Parse `relative` and check it against `model` in one step.
pub fn check_layout(relative: &Path, model: &ModelSpec) -> Result<CatalogPath, LayoutViolation> {
    let path = CatalogPath::parse(relative)?;
    path.check(model)?;
    Ok(path)
}
