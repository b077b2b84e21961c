use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use hydra_api::{DeploymentRuntime, ModelSpecTag};
use hydra_catalog::check::DEFAULT_CONCURRENCY;
use hydra_catalog::hub::{HUGGINGFACE_URL, MODELSCOPE_URL};

#[derive(Debug, Parser)]
#[command(name = "hydra")]
#[command(about = "Model catalog tooling for ModelSpec resources", long_about = None)]
pub struct Args {
    /// Catalog root (the directory that contains `models/`)
    #[arg(long, env = "HYDRA_CATALOG_ROOT", default_value = ".", global = true)]
    pub root: PathBuf,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "HYDRA_LOG", default_value = "warn", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate metadata files (every file in the catalog when none are given)
    Validate {
        files: Vec<PathBuf>,
    },
    /// List catalog entries
    List {
        /// Only models carrying this tag, e.g. TEXT_GENERATION
        #[arg(long)]
        tag: Option<ModelSpecTag>,
        /// Only models with a deployment for this runtime
        #[arg(long)]
        runtime: Option<DeploymentRuntime>,
    },
    /// Show one metadata file
    Show {
        file: PathBuf,
    },
    /// Merge every entry into a single index document
    Index {
        #[arg(long, default_value = "merged/index.yaml")]
        output: PathBuf,
    },
    /// Collect provider icons, links and names from the catalog
    Providers {
        #[arg(long, default_value = "providers_info.json")]
        output: PathBuf,
    },
    /// Check that every source repository exists on its hub
    CheckSources {
        /// Maximum in-flight hub requests
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,

        #[command(flatten)]
        hub: HubArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add the TOOLS tag and maxTokens from each model's tokenizer configuration
    Enrich {
        /// Maximum in-flight hub requests
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,

        #[command(flatten)]
        hub: HubArgs,

        /// Report the changes without rewriting metadata files
        #[arg(long)]
        dry_run: bool,
    },
    /// Create a metadata file for a Hugging Face model
    Scaffold {
        /// Hugging Face id, e.g. "Qwen/Qwen2.5-7B-Instruct"
        #[arg(long, env = "MODEL_NAME")]
        model_name: String,

        /// English/Chinese description; summarized from the model card when omitted
        #[arg(long)]
        description: Option<String>,

        /// Skip the model card lookup
        #[arg(long)]
        offline: bool,

        #[command(flatten)]
        hub: HubArgs,

        /// Provider directory JSON (from `hydra providers`); collected from the catalog when omitted
        #[arg(long)]
        providers: Option<PathBuf>,

        /// Replace an existing metadata file
        #[arg(long)]
        force: bool,

        /// Print the document instead of writing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the CustomResourceDefinition for every registered kind
    Crd,
}

#[derive(Debug, ClapArgs)]
pub struct HubArgs {
    #[arg(long, env = "HYDRA_HUGGINGFACE_URL", default_value = HUGGINGFACE_URL)]
    pub huggingface_url: String,

    #[arg(long, env = "HYDRA_MODELSCOPE_URL", default_value = MODELSCOPE_URL)]
    pub modelscope_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}
