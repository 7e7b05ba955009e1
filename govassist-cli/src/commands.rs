//! Subcommand implementations. Each returns the JSON text to print.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use govassist_rag::{
    AttributionTracker, Document, HashEmbedder, RelevanceContext, RetrievalConfig, Retriever,
    explain_scored_documents, l2_norm, relevance_statistics,
};
use serde_json::json;
use tracing::info;

use crate::cli::{Cli, Command, ConfigArgs};

/// Execute a parsed command line.
pub fn run(cli: Cli) -> Result<String> {
    let config = resolve_config(&cli.config)?;
    let embedder = Arc::new(build_embedder(&config, cli.config.seed));

    let output = match cli.command {
        Command::Retrieve { documents, query } => {
            let documents = load_documents(&documents)?;
            let retriever = build_retriever(config, embedder)?;
            let results = retriever.find_most_relevant(&query, &documents);
            info!(result_count = results.len(), "retrieve finished");
            serde_json::to_string_pretty(&results)?
        }
        Command::Attribute { documents, response, annotate } => {
            let documents = load_documents(&documents)?;
            let tracker = AttributionTracker::new(Arc::new(build_retriever(config, embedder)?));
            if annotate {
                serde_json::to_string_pretty(&tracker.annotate_response(&response, &documents))?
            } else {
                serde_json::to_string_pretty(&tracker.attribute_response(&response, &documents))?
            }
        }
        Command::Explain { documents, query, response, document_type } => {
            let documents = load_documents(&documents)?;
            let retriever = build_retriever(config, embedder)?;
            let results = retriever.find_most_relevant(&query, &documents);
            let context = document_type.map(|document_type| RelevanceContext {
                document_type: Some(document_type),
            });
            let explanations =
                explain_scored_documents(&results, &query, &response, context.as_ref());
            serde_json::to_string_pretty(&json!({
                "statistics": relevance_statistics(&explanations),
                "explanations": explanations,
            }))?
        }
        Command::Embed { text } => {
            let vector = embedder.embed_vector(&text);
            serde_json::to_string_pretty(&json!({
                "dimensions": vector.len(),
                "norm": l2_norm(&vector),
                "non_zero": vector.iter().filter(|v| **v != 0.0).count(),
                "cache": embedder.cache_stats(),
            }))?
        }
    };

    Ok(output)
}

/// Build the retrieval configuration from an optional file plus flag overrides.
pub fn resolve_config(args: &ConfigArgs) -> Result<RetrievalConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            RetrievalConfig::from_json(&raw)
                .with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => RetrievalConfig::default(),
    };

    if let Some(top_k) = args.top_k {
        config.top_k = top_k;
    }
    if let Some(threshold) = args.threshold {
        config.similarity_threshold = threshold;
    }
    if let Some(noise) = args.noise {
        config.noise_std_dev = noise;
    }
    config.validate()?;
    Ok(config)
}

/// Read a JSON array of documents.
pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read documents file {}", path.display()))?;
    let documents: Vec<Document> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of documents", path.display()))?;
    info!(count = documents.len(), path = %path.display(), "loaded documents");
    Ok(documents)
}

fn build_embedder(config: &RetrievalConfig, seed: Option<u64>) -> HashEmbedder {
    let embedder = HashEmbedder::from_config(config);
    match seed {
        Some(seed) => embedder.with_seed(seed),
        None => embedder,
    }
}

fn build_retriever(config: RetrievalConfig, embedder: Arc<HashEmbedder>) -> Result<Retriever> {
    Ok(Retriever::builder().config(config).embedding_provider(embedder).build()?)
}
