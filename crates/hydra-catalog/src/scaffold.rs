//! Generate a starter metadata file for a Hugging Face model.

use std::path::{Path, PathBuf};

use hydra_api::v1alpha1::{Icon, Link, LocalizedText, Provider};
use hydra_api::{
    Deployment, DeploymentRuntime, Descriptor, GpuType, HubRepo, ModelSpec, ModelSpecSpec,
    ModelSpecTag, Quantity, ResourceRequirements, Source,
};

use crate::error::{CatalogError, Result};
use crate::layout::CatalogPath;
use crate::loader::save_model;
use crate::providers::ProviderDirectory;

const DEFAULT_RUNTIME_VERSION: &str = ">=0.8.5";
const DEFAULT_CPU: u64 = 8;
const DEFAULT_MEMORY_GB: u64 = 640;
const DEFAULT_GPU_COUNT: u32 = 8;
const DEFAULT_PER_GPU_MEMORY_GB: u32 = 80;
const ICON_BASE_URL: &str = "https://public-resources.d.run/models/logos";

/// A generated entry and where it belongs in the catalog.
#[derive(Debug, Clone)]
pub struct Scaffold {
    pub location: CatalogPath,
    pub model: ModelSpec,
}

/// Catalog id for a model repo name: lowercase, dots become dashes.
pub fn model_id_for(repo_model: &str) -> String {
    repo_model.to_lowercase().replace('.', "-")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Build a new entry for `hf_name` (`org/model`) with catalog defaults,
/// filling provider details from `providers` where known.
pub fn scaffold(hf_name: &str, description: Option<&str>, providers: &ProviderDirectory) -> Result<Scaffold> {
    let Some((org, repo_model)) = hf_name.split_once('/') else {
        return Err(CatalogError::InvalidModelName(hf_name.to_string()));
    };
    if org.is_empty() || repo_model.is_empty() || repo_model.contains('/') {
        return Err(CatalogError::InvalidModelName(hf_name.to_string()));
    }

    let model_id = model_id_for(repo_model);
    let provider_id = providers.provider_for_org(org);
    let known = providers.get(&provider_id);

    let icon_src = known
        .map(|p| p.icon.clone())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("{ICON_BASE_URL}/{provider_id}-model-logo.svg"));
    let links = known
        .map(|p| p.links.clone())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| {
            vec![Link {
                description: "About".to_string(),
                url: format!("https://github.com/{org}"),
            }]
        });
    let provider_name = known
        .map(|p| p.name.clone())
        .filter(|n| !n.en_us.is_empty())
        .unwrap_or_else(|| LocalizedText::uniform(capitalize(&provider_id)));
    let description = description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("A large language model from {org}."));

    let spec = ModelSpecSpec {
        config: None,
        deployments: vec![Deployment {
            custom_runtime_args: Vec::new(),
            resource_requirements: ResourceRequirements {
                cpu: Quantity::from_integer(DEFAULT_CPU),
                gpu_count: DEFAULT_GPU_COUNT,
                gpu_type: GpuType::Vgpu,
                memory: Quantity::from_integer(DEFAULT_MEMORY_GB),
                per_gpu_memory_gb: DEFAULT_PER_GPU_MEMORY_GB,
            },
            runtime: DeploymentRuntime::Vllm,
            version_required: DEFAULT_RUNTIME_VERSION.to_string(),
        }],
        descriptor: Descriptor {
            description: LocalizedText::uniform(description),
            display: repo_model.to_string(),
            icon: Icon {
                src: icon_src,
                media_type: "image/svg".to_string(),
            },
            links,
            provider: Provider {
                id: provider_id.clone(),
                name: provider_name,
            },
            tags: vec![ModelSpecTag::TextGeneration],
        },
        source: Source::Mirrored {
            huggingface: HubRepo::new(hf_name),
            modelscope: HubRepo::new(hf_name),
        },
    };

    Ok(Scaffold {
        location: CatalogPath {
            provider: provider_id,
            model_id: model_id.clone(),
        },
        model: ModelSpec::new(&model_id, spec),
    })
}

/// Write the scaffold below `root`, refusing to replace an existing file
/// unless `overwrite` is set. Returns the written path.
pub fn write_scaffold(root: &Path, scaffold: &Scaffold, overwrite: bool) -> Result<PathBuf> {
    let path = root.join(scaffold.location.to_path());
    if path.exists() && !overwrite {
        return Err(CatalogError::AlreadyExists(path));
    }
    save_model(&path, &scaffold.model)?;
    tracing::info!(path = %path.display(), "wrote metadata");
    Ok(path)
}
