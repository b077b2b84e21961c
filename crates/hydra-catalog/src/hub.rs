use std::time::Duration;

use async_trait::async_trait;
use hydra_api::Hub;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::enrich::TokenizerConfig;
use crate::error::{CatalogError, Result};

pub const HUGGINGFACE_URL: &str = "https://huggingface.co";
pub const MODELSCOPE_URL: &str = "https://www.modelscope.cn";

const TOKENIZER_CONFIG_FILE: &str = "tokenizer_config.json";
const README_FILES: &[&str] = &["README.md", "readme.md", "Readme.md", "README"];

const MAX_ATTEMPTS: u32 = 5;
const BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Queries against model hubs.
#[async_trait]
pub trait HubClient: Send + Sync {
    /// Whether `repo` resolves on `hub`.
    async fn exists(&self, hub: Hub, repo: &str) -> Result<bool>;

    /// Best-matching repository for a free-text query, if any.
    async fn suggest(&self, hub: Hub, query: &str) -> Result<Option<String>>;

    /// `tokenizer_config.json` of a Hugging Face repository, if published.
    async fn tokenizer_config(&self, repo: &str) -> Result<Option<TokenizerConfig>>;

    /// Model card of a Hugging Face repository, if published.
    async fn readme(&self, repo: &str) -> Result<Option<String>>;
}

#[derive(Debug, Clone)]
pub struct HttpHubClient {
    client: Client,
    huggingface_url: String,
    modelscope_url: String,
}

impl HttpHubClient {
    pub fn new(client: Client, huggingface_url: &str, modelscope_url: &str) -> Self {
        Self {
            client,
            huggingface_url: huggingface_url.trim_end_matches('/').to_string(),
            modelscope_url: modelscope_url.trim_end_matches('/').to_string(),
        }
    }

    fn model_url(&self, hub: Hub, repo: &str) -> String {
        match hub {
            Hub::Huggingface => format!("{}/api/models/{}", self.huggingface_url, repo),
            Hub::Modelscope => format!("{}/api/v1/models/{}", self.modelscope_url, repo),
        }
    }

    fn raw_file_url(&self, repo: &str, file: &str) -> String {
        format!("{}/{}/raw/main/{}", self.huggingface_url, repo, file)
    }

    fn resolve_file_url(&self, repo: &str, file: &str) -> String {
        format!("{}/{}/resolve/main/{}", self.huggingface_url, repo, file)
    }

    async fn suggest_huggingface(&self, query: &str) -> Result<Option<String>> {
        let url = format!("{}/api/quicksearch", self.huggingface_url);
        let req = self
            .client
            .get(&url)
            .query(&[("type", "model"), ("q", query)]);
        let resp = send_with_retry(req, &url).await?;
        if !resp.status().is_success() {
            return Ok(None);
        }
        let body: QuickSearch = resp.json().await.map_err(|source| CatalogError::Http {
            url: url.clone(),
            source,
        })?;
        Ok(body.models.into_iter().next().map(|m| m.id))
    }

    async fn suggest_modelscope(&self, query: &str) -> Result<Option<String>> {
        let url = format!("{}/api/v1/dolphin/model/suggestv2", self.modelscope_url);
        let req = self.client.post(&url).json(&json!({
            "PageSize": 30,
            "PageNumber": 1,
            "SortBy": "Default",
            "Target": "",
            "SingleCriterion": [],
            "Name": query,
        }));
        let resp = send_with_retry(req, &url).await?;
        if !resp.status().is_success() {
            return Ok(None);
        }
        let body: SuggestEnvelope = resp.json().await.map_err(|source| CatalogError::Http {
            url: url.clone(),
            source,
        })?;
        if body.code != 200 {
            return Ok(None);
        }
        let first = body
            .data
            .and_then(|d| d.model)
            .and_then(|m| m.suggests.into_iter().next());
        Ok(first.map(|s| format!("{}/{}", s.path, s.name)))
    }
}

#[async_trait]
impl HubClient for HttpHubClient {
    async fn exists(&self, hub: Hub, repo: &str) -> Result<bool> {
        let url = self.model_url(hub, repo);
        let resp = send_with_retry(self.client.get(&url), &url).await?;
        tracing::debug!(%hub, repo, status = %resp.status(), "checked model");
        Ok(resp.status() == StatusCode::OK)
    }

    async fn suggest(&self, hub: Hub, query: &str) -> Result<Option<String>> {
        match hub {
            Hub::Huggingface => self.suggest_huggingface(query).await,
            Hub::Modelscope => self.suggest_modelscope(query).await,
        }
    }

    async fn tokenizer_config(&self, repo: &str) -> Result<Option<TokenizerConfig>> {
        let url = self.resolve_file_url(repo, TOKENIZER_CONFIG_FILE);
        let resp = send_with_retry(self.client.get(&url), &url).await?;
        if !resp.status().is_success() {
            tracing::debug!(repo, status = %resp.status(), "no tokenizer config");
            return Ok(None);
        }
        let config = resp.json().await.map_err(|source| CatalogError::Http {
            url: url.clone(),
            source,
        })?;
        Ok(Some(config))
    }

    async fn readme(&self, repo: &str) -> Result<Option<String>> {
        for file in README_FILES {
            let url = self.raw_file_url(repo, file);
            let resp = send_with_retry(self.client.get(&url), &url).await?;
            if !resp.status().is_success() {
                continue;
            }
            let text = resp.text().await.map_err(|source| CatalogError::Http {
                url: url.clone(),
                source,
            })?;
            return Ok(Some(text));
        }
        tracing::debug!(repo, "no model card");
        Ok(None)
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Send, retrying rate limits and 5xx responses with exponential backoff.
async fn send_with_retry(req: RequestBuilder, url: &str) -> Result<Response> {
    let mut attempt = 1;
    loop {
        let Some(this_try) = req.try_clone() else {
            return req.send().await.map_err(|source| CatalogError::Http {
                url: url.to_string(),
                source,
            });
        };
        let outcome = this_try.send().await;
        let retry = match &outcome {
            Ok(resp) => is_retryable(resp.status()),
            Err(e) => e.is_timeout() || e.is_connect(),
        };
        if !retry || attempt >= MAX_ATTEMPTS {
            return outcome.map_err(|source| CatalogError::Http {
                url: url.to_string(),
                source,
            });
        }
        let delay = BACKOFF_BASE * 2u32.pow(attempt - 1);
        tracing::warn!(url, attempt, ?delay, "hub request failed, retrying");
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[derive(Debug, Deserialize)]
struct QuickSearch {
    #[serde(default)]
    models: Vec<QuickSearchModel>,
}

#[derive(Debug, Deserialize)]
struct QuickSearchModel {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SuggestEnvelope {
    code: i64,
    data: Option<SuggestData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SuggestData {
    model: Option<SuggestModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SuggestModel {
    #[serde(default)]
    suggests: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Suggestion {
    name: String,
    path: String,
}
