use futures_util::stream::{self, StreamExt};
use hydra_api::Hub;
use serde::Serialize;

use crate::hub::HubClient;
use crate::loader::CatalogEntry;

pub const DEFAULT_CONCURRENCY: usize = 8;

/// A source repository that the hub does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingSource {
    pub model: String,
    pub hub: String,
    pub repo: String,
    /// Closest match from the hub's search, looked up by model id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A lookup that could not be answered (network failure, exhausted retries).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub model: String,
    pub hub: String,
    pub repo: String,
    pub error: String,
}

#[derive(Debug, Default, Serialize)]
pub struct SourceReport {
    pub checked: usize,
    pub missing: Vec<MissingSource>,
    pub failures: Vec<SourceFailure>,
}

impl SourceReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.failures.is_empty()
    }
}

struct Lookup<'a> {
    model: &'a str,
    hub: Hub,
    repo: &'a str,
}

enum Outcome {
    Found,
    Missing(MissingSource),
    Failed(SourceFailure),
}

/// Look up every source repository in `entries`, at most `concurrency` at a time.
pub async fn check_sources<C>(entries: &[CatalogEntry], client: &C, concurrency: usize) -> SourceReport
where
    C: HubClient + ?Sized,
{
    let lookups: Vec<Lookup<'_>> = entries
        .iter()
        .flat_map(|entry| {
            entry
                .model
                .spec
                .source
                .repos()
                .into_iter()
                .map(move |(hub, repo)| Lookup {
                    model: entry.name(),
                    hub,
                    repo: &repo.name,
                })
        })
        .collect();

    let checked = lookups.len();
    tracing::info!(lookups = checked, concurrency, "checking model sources");

    let outcomes: Vec<Outcome> = stream::iter(lookups)
        .map(|lookup| run_lookup(client, lookup))
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut report = SourceReport {
        checked,
        ..SourceReport::default()
    };
    for outcome in outcomes {
        match outcome {
            Outcome::Found => {}
            Outcome::Missing(m) => report.missing.push(m),
            Outcome::Failed(f) => report.failures.push(f),
        }
    }
    report
        .missing
        .sort_by(|a, b| (&a.model, &a.hub).cmp(&(&b.model, &b.hub)));
    report
        .failures
        .sort_by(|a, b| (&a.model, &a.hub).cmp(&(&b.model, &b.hub)));
    report
}

async fn run_lookup<C>(client: &C, lookup: Lookup<'_>) -> Outcome
where
    C: HubClient + ?Sized,
{
    let failed = |error: String| {
        Outcome::Failed(SourceFailure {
            model: lookup.model.to_string(),
            hub: lookup.hub.to_string(),
            repo: lookup.repo.to_string(),
            error,
        })
    };

    match client.exists(lookup.hub, lookup.repo).await {
        Ok(true) => Outcome::Found,
        Ok(false) => {
            tracing::warn!(model = lookup.model, hub = %lookup.hub, repo = lookup.repo, "source not found");
            let suggestion = match client.suggest(lookup.hub, lookup.model).await {
                Ok(s) => s,
                Err(e) => {
                    tracing::debug!(error = %e, "suggestion lookup failed");
                    None
                }
            };
            Outcome::Missing(MissingSource {
                model: lookup.model.to_string(),
                hub: lookup.hub.to_string(),
                repo: lookup.repo.to_string(),
                suggestion,
            })
        }
        Err(e) => failed(e.to_string()),
    }
}
