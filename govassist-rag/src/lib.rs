//! Document relevance scoring and source attribution for GovAssist.
//!
//! This crate provides:
//! - A cached, deterministic hash-bag embedder ([`HashEmbedder`]) behind the
//!   [`EmbeddingProvider`] trait
//! - A [`Retriever`] that ranks caller-supplied documents by clamped cosine
//!   similarity, with a per-instance similarity cache
//! - Sentence and markdown paragraph splitting
//! - An [`AttributionTracker`] that maps response sentences to supporting
//!   documents, falling back to keyword overlap when retrieval fails
//! - Relevance explanations ([`explain_sources`]) that say why a source was cited
//!
//! Public scoring entry points never fail: degenerate input yields empty or
//! zero results and internal failures degrade to documented defaults.

pub mod attribution;
pub mod cache;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod hash_embedder;
pub mod keyword;
pub mod relevance;
pub mod retriever;
pub mod similarity;
pub mod splitter;

pub use attribution::{
    AnnotatedResponse, AttributionMethod, AttributionTracker, CitationList, ResponseAttribution,
    SentenceAttribution,
};
pub use cache::{EmbeddingCacheStats, SimilarityCacheStats};
pub use config::{RetrievalConfig, RetrievalConfigBuilder};
pub use document::{Document, ScoredDocument};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use hash_embedder::HashEmbedder;
pub use keyword::{best_keyword_match, keyword_score, significant_words};
pub use relevance::{
    ConfidenceLevel, LevelCounts, RelevanceContext, RelevanceExplanation, RelevanceFactor,
    RelevanceFactors, RelevanceStatistics, explain_relevance, explain_scored_documents,
    explain_sources, relevance_statistics, try_explain_relevance,
};
pub use retriever::{Retriever, RetrieverBuilder};
pub use similarity::{cosine_similarity, l2_norm, l2_normalize};
pub use splitter::{
    should_skip_citation, split_paragraphs, split_sentences, split_with_basic_processing,
};
