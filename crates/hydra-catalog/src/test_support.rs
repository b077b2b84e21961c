use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use hydra_api::v1alpha1::{Icon, Link, LocalizedText, Provider};
use hydra_api::{
    Deployment, DeploymentRuntime, Descriptor, GpuType, Hub, HubRepo, ModelSpec, ModelSpecSpec,
    ModelSpecTag, Quantity, ResourceRequirements, Source,
};

use crate::enrich::TokenizerConfig;
use crate::error::{CatalogError, Result};
use crate::hub::HubClient;

pub fn make_model(name: &str, provider_id: &str, hf_name: &str) -> ModelSpec {
    ModelSpec::new(
        name,
        ModelSpecSpec {
            config: None,
            deployments: vec![Deployment {
                custom_runtime_args: vec![],
                resource_requirements: ResourceRequirements {
                    cpu: Quantity::from_integer(8),
                    gpu_count: 1,
                    gpu_type: GpuType::Gpu,
                    memory: Quantity::from_integer(32),
                    per_gpu_memory_gb: 24,
                },
                runtime: DeploymentRuntime::Vllm,
                version_required: ">=0.8.5".to_string(),
            }],
            descriptor: Descriptor {
                description: LocalizedText::uniform(format!("{name} description")),
                display: name.to_string(),
                icon: Icon {
                    src: format!("https://icons.example/{provider_id}.svg"),
                    media_type: "image/svg".to_string(),
                },
                links: vec![Link {
                    description: "About".to_string(),
                    url: format!("https://example.com/{provider_id}"),
                }],
                provider: Provider {
                    id: provider_id.to_string(),
                    name: LocalizedText::uniform(provider_id.to_uppercase()),
                },
                tags: vec![ModelSpecTag::TextGeneration],
            },
            source: Source::Huggingface(HubRepo::new(hf_name)),
        },
    )
}

pub fn write_model(root: &Path, relative: &str, model: &ModelSpec) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, hydra_api::codec::to_yaml(model).unwrap()).unwrap();
}

/// In-memory hub. Repositories listed in `broken` fail every request.
#[derive(Default)]
pub struct FakeHub {
    pub existing: HashSet<(Hub, String)>,
    pub suggestions: HashMap<(Hub, String), String>,
    pub tokenizer_configs: HashMap<String, TokenizerConfig>,
    pub readmes: HashMap<String, String>,
    pub broken: HashSet<String>,
    pub calls: AtomicUsize,
}

impl FakeHub {
    fn touch(&self, repo: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.broken.contains(repo) {
            return Err(CatalogError::InvalidModelName(repo.to_string()));
        }
        Ok(())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HubClient for FakeHub {
    async fn exists(&self, hub: Hub, repo: &str) -> Result<bool> {
        self.touch(repo)?;
        Ok(self.existing.contains(&(hub, repo.to_string())))
    }

    async fn suggest(&self, hub: Hub, query: &str) -> Result<Option<String>> {
        Ok(self.suggestions.get(&(hub, query.to_string())).cloned())
    }

    async fn tokenizer_config(&self, repo: &str) -> Result<Option<TokenizerConfig>> {
        self.touch(repo)?;
        Ok(self.tokenizer_configs.get(repo).cloned())
    }

    async fn readme(&self, repo: &str) -> Result<Option<String>> {
        self.touch(repo)?;
        Ok(self.readmes.get(repo).cloned())
    }
}
