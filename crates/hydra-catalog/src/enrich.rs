//! Fill in tags and limits from a model's published tokenizer configuration.

use std::path::PathBuf;

use futures_util::stream::{self, StreamExt};
use hydra_api::{Hub, ModelConfig, ModelSpec, ModelSpecTag};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::check::SourceFailure;
use crate::error::Result;
use crate::hub::HubClient;
use crate::loader::CatalogEntry;

/// Chat template fragments that only appear when tool definitions are rendered.
const TOOL_MARKERS: &[&str] = &["if tools", "custom_tools"];

/// The parts of a Hugging Face `tokenizer_config.json` the catalog uses.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TokenizerConfig {
    /// Either one template string or a list of `{name, template}` objects.
    #[serde(default)]
    pub chat_template: Option<Value>,
    #[serde(default)]
    pub model_max_length: Option<f64>,
}

impl TokenizerConfig {
    fn templates(&self) -> Vec<&str> {
        match &self.chat_template {
            Some(Value::String(t)) => vec![t.as_str()],
            Some(Value::Array(named)) => named
                .iter()
                .filter_map(|t| t.get("template").and_then(Value::as_str))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether any chat template renders tool definitions.
    pub fn supports_tools(&self) -> bool {
        self.templates()
            .iter()
            .any(|t| TOOL_MARKERS.iter().any(|m| t.contains(m)))
    }

    /// Context window in tokens. Tokenizers without a limit publish a huge
    /// sentinel (`1e30`), which is treated as unknown.
    pub fn max_tokens(&self) -> Option<u64> {
        let v = self.model_max_length?;
        (1.0..u64::MAX as f64).contains(&v).then_some(v as u64)
    }
}

/// What [`apply`] changed on one model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub added_tools_tag: bool,
    /// Set when `maxTokens` was newly recorded.
    pub max_tokens: Option<u64>,
}

impl Enrichment {
    pub fn is_change(&self) -> bool {
        self.added_tools_tag || self.max_tokens.is_some()
    }
}

/// Add the `TOOLS` tag and record `maxTokens`; values already present are kept.
pub fn apply(model: &mut ModelSpec, config: &TokenizerConfig) -> Enrichment {
    let mut change = Enrichment::default();

    let descriptor = &mut model.spec.descriptor;
    if config.supports_tools() && !descriptor.has_tag(ModelSpecTag::Tools) {
        descriptor.tags.push(ModelSpecTag::Tools);
        change.added_tools_tag = true;
    }

    if let Some(max) = config.max_tokens() {
        let model_config = model.spec.config.get_or_insert_with(ModelConfig::default);
        if model_config.max_tokens.is_none() {
            model_config.max_tokens = Some(max);
            change.max_tokens = Some(max);
        }
    }
    change
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedModel {
    pub model: String,
    pub path: PathBuf,
    pub added_tools_tag: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
}

#[derive(Debug, Default, Serialize)]
pub struct EnrichReport {
    /// Models with a Hugging Face source.
    pub checked: usize,
    pub updated: Vec<EnrichedModel>,
    /// Models whose repository publishes no tokenizer configuration.
    pub unavailable: Vec<String>,
    pub failures: Vec<SourceFailure>,
}

/// Fetch the tokenizer configuration of every entry with a Hugging Face
/// source, at most `concurrency` at a time, and apply it in place.
pub async fn enrich_entries<C>(entries: &mut [CatalogEntry], client: &C, concurrency: usize) -> EnrichReport
where
    C: HubClient + ?Sized,
{
    let requests: Vec<(usize, String)> = entries
        .iter()
        .enumerate()
        .filter_map(|(i, e)| e.model.spec.source.huggingface().map(|r| (i, r.name.clone())))
        .collect();
    tracing::info!(models = requests.len(), concurrency, "fetching tokenizer configs");

    let fetched: Vec<(usize, String, Result<Option<TokenizerConfig>>)> = stream::iter(requests)
        .map(|(i, repo)| async move {
            let result = client.tokenizer_config(&repo).await;
            (i, repo, result)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut report = EnrichReport {
        checked: fetched.len(),
        ..EnrichReport::default()
    };
    for (i, repo, result) in fetched {
        let entry = &mut entries[i];
        let name = entry.name().to_string();
        match result {
            Ok(Some(config)) => {
                let change = apply(&mut entry.model, &config);
                if change.is_change() {
                    tracing::debug!(model = %name, ?change, "enriched");
                    report.updated.push(EnrichedModel {
                        model: name,
                        path: entry.path.clone(),
                        added_tools_tag: change.added_tools_tag,
                        max_tokens: change.max_tokens,
                    });
                }
            }
            Ok(None) => report.unavailable.push(name),
            Err(e) => report.failures.push(SourceFailure {
                model: name,
                hub: Hub::Huggingface.to_string(),
                repo,
                error: e.to_string(),
            }),
        }
    }
    report.updated.sort_by(|a, b| a.model.cmp(&b.model));
    report.unavailable.sort();
    report.failures.sort_by(|a, b| a.model.cmp(&b.model));
    report
}
