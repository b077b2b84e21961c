mod args;
mod output;

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use hydra_api::{codec, telemetry, Scheme};
use hydra_catalog::loader::{find_metadata_files, load_model};
use hydra_catalog::{
    check_sources, enrich_entries, readme_summary, save_model, scaffold, validate_files,
    write_scaffold, Catalog, CatalogIndex, HttpHubClient, ProviderDirectory,
};
use reqwest::Client;

use crate::args::{Args, Command, HubArgs};
use crate::output::{
    print_enrich_report, print_model_detail, print_models, print_source_report, print_validation,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_tracing("hydra", &args.log);

    let scheme = Scheme::with_defaults()?;
    let root = args.root.as_path();

    match args.command {
        Command::Validate { files } => {
            let files = if files.is_empty() {
                find_metadata_files(root)?
            } else {
                files
            };
            let reports = validate_files(root, &files, &scheme);
            print_validation(&reports);
            let invalid = reports.iter().filter(|r| !r.is_valid()).count();
            if invalid > 0 {
                bail!("{invalid} metadata file(s) failed validation");
            }
        }
        Command::List { tag, runtime } => {
            let catalog = Catalog::load(root, &scheme)?;
            let entries: Vec<_> = catalog
                .entries
                .iter()
                .filter(|e| tag.map_or(true, |t| e.model.spec.descriptor.has_tag(t)))
                .filter(|e| runtime.map_or(true, |r| e.model.spec.deployment_for(r).is_some()))
                .collect();
            print_models(&entries);
            if !catalog.failures.is_empty() {
                eprintln!("✗ {} metadata file(s) could not be loaded", catalog.failures.len());
            }
        }
        Command::Show { file } => {
            let path = if file.is_absolute() { file } else { root.join(file) };
            let model = load_model(&path, &scheme)?;
            print_model_detail(&model);
        }
        Command::Index { output } => {
            let catalog = load_strict(root, &scheme)?;
            let index = CatalogIndex::build(&catalog.entries, Utc::now());
            let path = root.join(&output);
            write_file(&path, &codec::to_yaml(&index)?)?;
            println!("✓ Indexed {} models into {}", index.entries.len(), path.display());
        }
        Command::Providers { output } => {
            let catalog = load_strict(root, &scheme)?;
            let dir = ProviderDirectory::collect(&catalog.entries);
            let path = root.join(&output);
            write_file(&path, &serde_json::to_string_pretty(&dir)?)?;
            println!(
                "✓ Collected {} providers ({} org mappings) into {}",
                dir.providers.len(),
                dir.mappings.len(),
                path.display()
            );
        }
        Command::CheckSources {
            concurrency,
            hub,
            json,
        } => {
            let catalog = load_strict(root, &scheme)?;
            let hubs = hub_client(&hub)?;
            let report = check_sources(&catalog.entries, &hubs, concurrency).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_source_report(&report);
            }
            if !report.is_clean() {
                bail!(
                    "{} missing and {} unreachable source(s)",
                    report.missing.len(),
                    report.failures.len()
                );
            }
        }
        Command::Enrich {
            concurrency,
            hub,
            dry_run,
        } => {
            let mut catalog = load_strict(root, &scheme)?;
            let hubs = hub_client(&hub)?;
            let report = enrich_entries(&mut catalog.entries, &hubs, concurrency).await;
            if !dry_run {
                for updated in &report.updated {
                    if let Some(entry) = catalog.entries.iter().find(|e| e.path == updated.path) {
                        save_model(&root.join(&entry.path), &entry.model)?;
                    }
                }
            }
            print_enrich_report(&report, dry_run);
            if !report.failures.is_empty() {
                bail!("{} tokenizer config(s) could not be fetched", report.failures.len());
            }
        }
        Command::Scaffold {
            model_name,
            description,
            offline,
            hub,
            providers,
            force,
            dry_run,
        } => {
            let dir = provider_directory(root, providers.as_deref(), &scheme)?;
            let description = match description {
                Some(d) => Some(d),
                None if offline => None,
                None => readme_summary(&hub_client(&hub)?, &model_name).await,
            };
            let scaffolded = scaffold(&model_name, description.as_deref(), &dir)?;
            if dry_run {
                print!("{}", codec::to_yaml(&scaffolded.model)?);
            } else {
                let path = write_scaffold(root, &scaffolded, force)?;
                println!("✓ Created {}", path.display());
            }
        }
        Command::Crd => {
            for (i, crd) in scheme.crds()?.iter().enumerate() {
                if i > 0 {
                    println!("---");
                }
                print!("{}", codec::to_yaml(crd)?);
            }
        }
    }

    Ok(())
}

fn hub_client(args: &HubArgs) -> Result<HttpHubClient> {
    let client = Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;
    Ok(HttpHubClient::new(client, &args.huggingface_url, &args.modelscope_url))
}

/// Load the catalog, refusing to continue past any unreadable entry.
fn load_strict(root: &Path, scheme: &Scheme) -> Result<Catalog> {
    let catalog = Catalog::load(root, scheme)?;
    if let Some(first) = catalog.failures.first() {
        bail!(
            "{} metadata file(s) could not be loaded, first: {first}",
            catalog.failures.len()
        );
    }
    Ok(catalog)
}

fn provider_directory(root: &Path, file: Option<&Path>, scheme: &Scheme) -> Result<ProviderDirectory> {
    if let Some(file) = file {
        let text = std::fs::read_to_string(file)
            .with_context(|| format!("reading {}", file.display()))?;
        return serde_json::from_str(&text).with_context(|| format!("parsing {}", file.display()));
    }
    match Catalog::load(root, scheme) {
        Ok(catalog) => Ok(ProviderDirectory::collect(&catalog.entries)),
        Err(e) => {
            tracing::warn!(error = %e, "no catalog to collect providers from");
            Ok(ProviderDirectory::default())
        }
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}
