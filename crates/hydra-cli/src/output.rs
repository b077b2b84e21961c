use hydra_api::ModelSpec;
use hydra_catalog::{CatalogEntry, EnrichReport, FileReport, SourceReport};

pub fn print_validation(reports: &[FileReport]) {
    for report in reports {
        match &report.result {
            Ok(()) => println!("✓ {}", report.path.display()),
            Err(e) => println!("✗ {e}"),
        }
    }
    let invalid = reports.iter().filter(|r| !r.is_valid()).count();
    println!("\n{} checked, {} invalid", reports.len(), invalid);
}

pub fn print_models(entries: &[&CatalogEntry]) {
    println!("\n=== Hydra Models ===\n");
    if entries.is_empty() {
        println!("No models found.");
        return;
    }
    println!(
        "{:<35} {:<15} {:<18} {:<40}",
        "Name", "Provider", "Runtimes", "Source"
    );
    println!("{:-<110}", "");
    for entry in entries {
        let spec = &entry.model.spec;
        let runtimes: Vec<&str> = spec.deployments.iter().map(|d| d.runtime.as_str()).collect();
        let (hub, repo) = spec.source.primary();
        println!(
            "{:<35} {:<15} {:<18} {}:{}",
            entry.name(),
            spec.descriptor.provider.id,
            if runtimes.is_empty() { "-".to_string() } else { runtimes.join(",") },
            hub,
            repo.name
        );
    }
    println!();
}

pub fn print_model_detail(model: &ModelSpec) {
    let spec = &model.spec;
    let d = &spec.descriptor;
    println!("\n=== Model Detail ===\n");
    println!("  Name:     {}", model.metadata.name.as_deref().unwrap_or(""));
    println!("  Display:  {}", d.display);
    println!("  Provider: {} ({})", d.provider.name.en_us, d.provider.id);
    println!("  Summary:  {}", d.description.en_us);
    let tags: Vec<&str> = d.tags.iter().map(|t| t.as_str()).collect();
    println!("  Tags:     {}", tags.join(", "));
    for (hub, repo) in spec.source.repos() {
        println!("  Source:   {}:{}", hub, repo.name);
    }

    if spec.deployments.is_empty() {
        println!("\n  (no deployments)");
    } else {
        println!("\n  [Deployments]");
        println!(
            "  {:<8} {:<12} {:<8} {:<10} {:<6} {:<6} {:<10}",
            "Runtime", "Version", "CPU", "Memory", "GPUs", "Type", "GB/GPU"
        );
        for dep in &spec.deployments {
            let r = &dep.resource_requirements;
            println!(
                "  {:<8} {:<12} {:<8} {:<10} {:<6} {:<6} {:<10}",
                dep.runtime.as_str(),
                dep.version_required,
                r.cpu.to_string(),
                r.memory.to_string(),
                r.gpu_count,
                r.gpu_type.as_str(),
                r.per_gpu_memory_gb
            );
            if !dep.custom_runtime_args.is_empty() {
                println!("           args: {}", dep.custom_runtime_args.join(" "));
            }
        }
    }
    println!();
}

pub fn print_source_report(report: &SourceReport) {
    println!("\n=== Source Check ===\n");
    println!("  {} repositories checked", report.checked);
    if report.is_clean() {
        println!("  ✓ all sources found");
        println!();
        return;
    }
    if !report.missing.is_empty() {
        println!("\n  [Missing]");
        println!("  {:<30} {:<12} {:<40} {:<40}", "Model", "Hub", "Repo", "Suggestion");
        for m in &report.missing {
            println!(
                "  {:<30} {:<12} {:<40} {:<40}",
                m.model,
                m.hub,
                m.repo,
                m.suggestion.as_deref().unwrap_or("-")
            );
        }
    }
    if !report.failures.is_empty() {
        println!("\n  [Unreachable]");
        for f in &report.failures {
            println!("  ✗ {} {}:{}: {}", f.model, f.hub, f.repo, f.error);
        }
    }
    println!();
}

pub fn print_enrich_report(report: &EnrichReport, dry_run: bool) {
    println!("\n=== Tokenizer Enrichment ===\n");
    println!("  {} Hugging Face models checked", report.checked);
    if report.updated.is_empty() {
        println!("  ✓ nothing to update");
    } else {
        println!("\n  [{}]", if dry_run { "Would update" } else { "Updated" });
        println!("  {:<30} {:<8} {:<12} {:<50}", "Model", "TOOLS", "maxTokens", "Path");
        for u in &report.updated {
            println!(
                "  {:<30} {:<8} {:<12} {:<50}",
                u.model,
                if u.added_tools_tag { "+" } else { "-" },
                u.max_tokens.map_or_else(|| "-".to_string(), |n| n.to_string()),
                u.path.display()
            );
        }
    }
    if !report.unavailable.is_empty() {
        println!("\n  [No tokenizer config]");
        for name in &report.unavailable {
            println!("  - {name}");
        }
    }
    if !report.failures.is_empty() {
        println!("\n  [Unreachable]");
        for f in &report.failures {
            println!("  ✗ {} {}: {}", f.model, f.repo, f.error);
        }
    }
    println!();
}
