//! # `textcde` Library Crate
//!
//! Command-line access to the enrichment pipeline: run a full enrichment for a
//! single event, or linearize an analysis result that is already on disk.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use textcde::{
    linearize,
    providers::{
        analysis::HttpAnalysisClient,
        store::{HttpBlobStore, LocalBlobStore},
    },
    AnalysisDocument, BlobStore, Enricher, EnricherConfig, EnrichmentOutcome, EnrichmentRequest,
    LinearizationConfig,
};
use tracing::{info, warn};

// --- CLI Argument Structs ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enrich one document described by an indexing event
    Enrich(EnrichArgs),
    /// Linearize an analysis result into page-delimited text
    Linearize(LinearizeArgs),
}

#[derive(Parser, Debug)]
pub struct EnrichArgs {
    /// Path to the event JSON, or `-` for stdin.
    #[arg(long, default_value = "-")]
    pub event: String,
    /// Root directory of a local blob store.
    #[arg(long, env = "TEXTCDE_STORE__ROOT", conflicts_with = "store_endpoint")]
    pub store_root: Option<PathBuf>,
    /// Base URL of an HTTP blob store.
    #[arg(long, env = "TEXTCDE_STORE__ENDPOINT")]
    pub store_endpoint: Option<String>,
    #[arg(long, env = "TEXTCDE_STORE__API_KEY")]
    pub store_api_key: Option<String>,
    /// Base URL of the document analysis service.
    #[arg(long, env = "TEXTCDE_ANALYSIS__API_URL")]
    pub analysis_url: String,
    #[arg(long, env = "TEXTCDE_ANALYSIS__API_KEY")]
    pub analysis_key: Option<String>,
    #[arg(long, env = "TEXTCDE_ANALYSIS__POLL_INTERVAL_MS", default_value_t = 1000)]
    pub poll_interval_ms: u64,
    /// Parent directory of the per-invocation download directories.
    #[arg(long, env = "SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,
    /// Scheme of the source locator sent to the analysis service.
    #[arg(long, env = "SOURCE_SCHEME", default_value = textcde::constants::DEFAULT_SOURCE_SCHEME)]
    pub source_scheme: String,
}

#[derive(Parser, Debug)]
pub struct LinearizeArgs {
    /// Path to the analysis result JSON, or `-` for stdin.
    #[arg(long, default_value = "-")]
    pub document: String,
}

// --- Public Entrypoint ---

/// The main entry point for the `textcde` library.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Enrich(args) => handle_enrich(args).await,
        Commands::Linearize(args) => handle_linearize(args),
    }
}

// --- Command Handlers ---

async fn handle_enrich(args: EnrichArgs) -> Result<()> {
    let raw = read_input(&args.event)?;
    let request: EnrichmentRequest =
        serde_json::from_str(&raw).context("Failed to parse enrichment event")?;
    info!("Received event: {}", raw.trim());

    let enricher = build_enricher(&args)?;
    let outcome = enricher.process(&request).await;
    match &outcome {
        EnrichmentOutcome::Enriched(response) => {
            info!("Wrote linearized text to '{}'", response.s3_object_key)
        }
        EnrichmentOutcome::Unsupported(_) => warn!("Document is not a supported file type"),
        EnrichmentOutcome::Failed { error, .. } => warn!("Enrichment fell back: {error}"),
    }

    println!("{}", serde_json::to_string_pretty(outcome.response())?);
    Ok(())
}

fn handle_linearize(args: LinearizeArgs) -> Result<()> {
    let raw = read_input(&args.document)?;
    print!("{}", linearize_document(&raw)?);
    Ok(())
}

// --- Helpers ---

/// Builds an `Enricher` from command-line arguments.
pub fn build_enricher(args: &EnrichArgs) -> Result<Enricher> {
    let store: Box<dyn BlobStore> = match (&args.store_root, &args.store_endpoint) {
        (Some(root), None) => Box::new(LocalBlobStore::new(root)),
        (None, Some(endpoint)) => Box::new(HttpBlobStore::new(
            endpoint.clone(),
            args.store_api_key.clone(),
        )?),
        _ => return Err(anyhow!("Exactly one of --store-root or --store-endpoint is required")),
    };
    let analyzer = HttpAnalysisClient::new(
        args.analysis_url.clone(),
        args.analysis_key.clone(),
        Duration::from_millis(args.poll_interval_ms),
    )?;

    let mut config = EnricherConfig {
        source_scheme: args.source_scheme.clone(),
        ..Default::default()
    };
    if let Some(scratch_dir) = &args.scratch_dir {
        config.scratch_dir = scratch_dir.clone();
    }

    Ok(Enricher::new(store, Box::new(analyzer), config))
}

/// Linearizes an analysis result given as JSON with the enrichment settings.
pub fn linearize_document(json: &str) -> Result<String> {
    let document: AnalysisDocument =
        serde_json::from_str(json).context("Failed to parse analysis document")?;
    let text = linearize(&document, &LinearizationConfig::enrichment())?;
    Ok(text)
}

/// Reads a whole file, or stdin when `source` is `-`.
pub fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(source).with_context(|| format!("Failed to read '{source}'"))
}
