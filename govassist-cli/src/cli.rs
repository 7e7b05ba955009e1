//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Score government documents against questions and attribute responses to sources.
#[derive(Parser, Debug)]
#[command(name = "govassist", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Retrieval configuration overrides, applied on top of `--config` or the defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// JSON file holding a serialized retrieval configuration
    #[arg(long, global = true, env = "GOVASSIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum number of documents to return
    #[arg(long, global = true, env = "GOVASSIST_TOP_K")]
    pub top_k: Option<usize>,

    /// Minimum similarity score in [0, 1]
    #[arg(long, global = true, env = "GOVASSIST_THRESHOLD")]
    pub threshold: Option<f32>,

    /// Standard deviation of embedding noise (0 disables noise)
    #[arg(long, global = true, env = "GOVASSIST_NOISE")]
    pub noise: Option<f32>,

    /// Seed for the embedding noise generator
    #[arg(long, global = true, env = "GOVASSIST_SEED")]
    pub seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank documents by relevance to a query
    Retrieve {
        /// JSON file containing an array of documents
        #[arg(long)]
        documents: PathBuf,
        /// The user question
        #[arg(long)]
        query: String,
    },
    /// Attribute each sentence of a response to a supporting document
    Attribute {
        /// JSON file containing an array of documents
        #[arg(long)]
        documents: PathBuf,
        /// The generated response text
        #[arg(long)]
        response: String,
        /// Emit the response with footnote markers instead of per-sentence records
        #[arg(long)]
        annotate: bool,
    },
    /// Retrieve documents for a query and explain why each one is relevant
    Explain {
        /// JSON file containing an array of documents
        #[arg(long)]
        documents: PathBuf,
        /// The user question
        #[arg(long)]
        query: String,
        /// The generated response text
        #[arg(long)]
        response: String,
        /// Document type the user is looking for
        #[arg(long)]
        document_type: Option<String>,
    },
    /// Embed a text and report vector statistics
    Embed {
        /// Text to embed
        #[arg(long)]
        text: String,
    },
}
