use std::path::{Path, PathBuf};

use hydra_api::{codec, ModelSpec, Scheme};
use serde_json::Value;

use crate::error::{CatalogError, Result};
use crate::layout::{METADATA_FILE, MODELS_DIR};

/// A decoded metadata file.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Path relative to the catalog root.
    pub path: PathBuf,
    pub model: ModelSpec,
}

impl CatalogEntry {
    pub fn name(&self) -> &str {
        self.model.metadata.name.as_deref().unwrap_or_default()
    }
}

/// Every metadata file under `{root}/models`, decoded.
///
/// Files that fail to decode are kept in `failures` instead of aborting the
/// whole load.
#[derive(Debug)]
pub struct Catalog {
    pub root: PathBuf,
    pub entries: Vec<CatalogEntry>,
    pub failures: Vec<CatalogError>,
}

impl Catalog {
    pub fn load(root: &Path, scheme: &Scheme) -> Result<Self> {
        let files = find_metadata_files(root)?;
        tracing::info!(root = %root.display(), files = files.len(), "loading catalog");

        let mut entries = Vec::with_capacity(files.len());
        let mut failures = Vec::new();
        for relative in files {
            match load_model(&root.join(&relative), scheme) {
                Ok(model) => entries.push(CatalogEntry {
                    path: relative,
                    model,
                }),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping metadata file");
                    failures.push(e);
                }
            }
        }

        Ok(Self {
            root: root.to_path_buf(),
            entries,
            failures,
        })
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }
}

/// Relative paths of every `metadata.yaml` below `{root}/models`, sorted.
pub fn find_metadata_files(root: &Path) -> Result<Vec<PathBuf>> {
    let models = root.join(MODELS_DIR);
    let mut out = Vec::new();
    collect_metadata_files(&models, &mut out)?;
    let mut relative: Vec<PathBuf> = out
        .into_iter()
        .filter_map(|p| p.strip_prefix(root).ok().map(Path::to_path_buf))
        .collect();
    relative.sort();
    Ok(relative)
}

/// Symlinks are not followed.
fn collect_metadata_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| CatalogError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| CatalogError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| CatalogError::io(&path, e))?;
        if file_type.is_dir() {
            collect_metadata_files(&path, out)?;
        } else if file_type.is_file() && entry.file_name() == METADATA_FILE {
            out.push(path);
        } else if file_type.is_symlink() {
            tracing::debug!(path = %path.display(), "skipping symlink");
        }
    }
    Ok(())
}

/// Read and decode one metadata file. The document must declare the
/// ModelSpec kind.
pub fn load_model(path: &Path, scheme: &Scheme) -> Result<ModelSpec> {
    let text = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    decode_model(&text, scheme).map_err(|source| CatalogError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

pub fn decode_model(text: &str, scheme: &Scheme) -> hydra_api::Result<ModelSpec> {
    let doc = codec::yaml_to_value(text)?;
    if doc.is_null() {
        return Err(hydra_api::Error::Malformed {
            kind: "document",
            message: "empty document".to_string(),
        });
    }
    let info = scheme.recognize(&doc)?;
    if info.gvk.kind != hydra_api::v1alpha1::KIND {
        return Err(hydra_api::Error::UnexpectedKind {
            expected: hydra_api::v1alpha1::KIND.to_string(),
            actual: info.gvk.kind.clone(),
        });
    }
    scheme.decode::<ModelSpec>(doc)
}

/// Write `model` as YAML to `path`, creating parent directories.
pub fn save_model(path: &Path, model: &ModelSpec) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
    }
    let yaml = codec::to_yaml(model)?;
    std::fs::write(path, yaml).map_err(|e| CatalogError::io(path, e))
}

/// Read a file that may be either JSON or YAML into an untyped value.
pub fn read_document(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    codec::yaml_to_value(&text).map_err(|source| CatalogError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
