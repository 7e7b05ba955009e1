//! Similarity-based document retrieval.
//!
//! The [`Retriever`] embeds a query and each candidate document's
//! representative text, scores them by clamped cosine similarity, and returns
//! the top-k documents above a threshold.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use govassist_rag::{HashEmbedder, Retriever, RetrievalConfig};
//!
//! let retriever = Retriever::builder()
//!     .config(RetrievalConfig::default())
//!     .embedding_provider(Arc::new(HashEmbedder::new()))
//!     .build()?;
//!
//! let results = retriever.find_most_relevant("How do I renew a passport?", &documents);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, error, info, warn};

use crate::cache::{CacheCounters, SimilarityCacheStats};
use crate::config::RetrievalConfig;
use crate::document::{Document, ScoredDocument, char_prefix};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::hash_embedder::HashEmbedder;
use crate::similarity::{cosine_similarity, vector_digest};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SimilarityKey {
    query_digest: u64,
    document_key: String,
}

/// Scores candidate documents against a query and ranks them.
///
/// The similarity cache lives on the instance; construct separate retrievers
/// for isolated caches. Construct one via [`Retriever::builder()`].
pub struct Retriever {
    config: RetrievalConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    similarity_cache: RwLock<HashMap<SimilarityKey, f32>>,
    counters: CacheCounters,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("config", &self.config)
            .field("dimensions", &self.embedding_provider.dimensions())
            .finish_non_exhaustive()
    }
}

impl Retriever {
    /// Create a new [`RetrieverBuilder`].
    pub fn builder() -> RetrieverBuilder {
        RetrieverBuilder::default()
    }

    /// Create a retriever backed by a [`HashEmbedder`] built from `config`.
    pub fn with_hash_embedder(config: RetrievalConfig) -> Self {
        let embedder = Arc::new(HashEmbedder::from_config(&config));
        Self::new(config, embedder)
    }

    fn new(config: RetrievalConfig, embedding_provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            config,
            embedding_provider,
            similarity_cache: RwLock::new(HashMap::new()),
            counters: CacheCounters::default(),
        }
    }

    /// Return a reference to the retrieval configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Find the most relevant documents using the configured `top_k` and
    /// `similarity_threshold`.
    pub fn find_most_relevant(&self, query: &str, documents: &[Document]) -> Vec<ScoredDocument> {
        self.find_most_relevant_with(
            query,
            documents,
            self.config.top_k,
            self.config.similarity_threshold,
        )
    }

    /// Find the most relevant documents for `query`.
    ///
    /// Returns at most `top_k` documents with `similarity_score >= threshold`,
    /// ordered by descending score (ties keep input order). A blank query or
    /// an empty document list yields an empty result.
    ///
    /// This never fails: if scoring the query fails as a whole, the result is
    /// the first document with the configured `fallback_score`.
    pub fn find_most_relevant_with(
        &self,
        query: &str,
        documents: &[Document],
        top_k: usize,
        threshold: f32,
    ) -> Vec<ScoredDocument> {
        match self.try_find_most_relevant(query, documents, top_k, threshold) {
            Ok(results) => results,
            Err(e) => {
                error!(
                    query = %char_prefix(query, 50),
                    error = %e,
                    "retrieval failed, using fallback"
                );
                self.fallback_results(documents)
            }
        }
    }

    /// Strict variant of [`find_most_relevant_with`](Self::find_most_relevant_with).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::RetrievalError`] if the query cannot be embedded.
    /// Failures embedding an individual document are absorbed as a score of 0.0.
    pub fn try_find_most_relevant(
        &self,
        query: &str,
        documents: &[Document],
        top_k: usize,
        threshold: f32,
    ) -> Result<Vec<ScoredDocument>> {
        if query.trim().is_empty() || documents.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self
            .embedding_provider
            .embed(query)
            .map_err(|e| RagError::RetrievalError(format!("query embedding failed: {e}")))?;
        if query_embedding.iter().any(|v| !v.is_finite()) {
            return Err(RagError::RetrievalError(
                "query embedding contains non-finite values".to_string(),
            ));
        }
        let query_digest = vector_digest(&query_embedding);

        let mut scored: Vec<ScoredDocument> = documents
            .iter()
            .filter_map(|document| {
                let score = self.document_similarity(&query_embedding, query_digest, document);
                (score >= threshold).then(|| ScoredDocument::new(document, score))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity_score.partial_cmp(&a.similarity_score).unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);

        info!(
            result_count = scored.len(),
            top_score = scored.first().map_or(0.0, |s| s.similarity_score),
            "retrieval completed"
        );

        Ok(scored)
    }

    /// Remove every cached similarity and reset the hit/miss counters.
    pub fn clear_cache(&self) {
        self.write_cache().clear();
        self.counters.reset();
        info!("cleared similarity cache");
    }

    /// Report the similarity cache size and hit/miss counts.
    pub fn cache_stats(&self) -> SimilarityCacheStats {
        let (hits, misses) = self.counters.snapshot();
        SimilarityCacheStats { cached_similarities: self.read_cache().len(), hits, misses }
    }

    /// Similarity between a query embedding and one document, in `[0, 1]`.
    fn document_similarity(
        &self,
        query_embedding: &[f32],
        query_digest: u64,
        document: &Document,
    ) -> f32 {
        let key = SimilarityKey {
            query_digest,
            document_key: document.cache_key(self.config.document_key_chars),
        };
        if let Some(score) = self.read_cache().get(&key) {
            self.counters.hit();
            return *score;
        }
        self.counters.miss();

        let text = document
            .extract_text(self.config.max_content_chars, self.config.max_metadata_value_chars);
        if text.is_empty() {
            return 0.0;
        }

        let document_embedding = match self.embedding_provider.embed(&text) {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(
                    document.id = ?document.document_id,
                    error = %e,
                    "failed to embed document, scoring as 0.0"
                );
                return 0.0;
            }
        };

        let score = cosine_similarity(query_embedding, &document_embedding);
        debug!(document.id = ?document.document_id, score, "scored document");
        self.write_cache().insert(key, score);
        score
    }

    fn fallback_results(&self, documents: &[Document]) -> Vec<ScoredDocument> {
        documents
            .first()
            .map(|first| vec![ScoredDocument::new(first, self.config.fallback_score)])
            .unwrap_or_default()
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, HashMap<SimilarityKey, f32>> {
        self.similarity_cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<SimilarityKey, f32>> {
        self.similarity_cache.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builder for constructing a [`Retriever`].
///
/// The embedding provider is required; the configuration defaults to
/// [`RetrievalConfig::default()`].
#[derive(Default)]
pub struct RetrieverBuilder {
    config: Option<RetrievalConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
}

impl RetrieverBuilder {
    /// Set the retrieval configuration.
    pub fn config(mut self, config: RetrievalConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Build the [`Retriever`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if no embedding provider was set or
    /// the configuration is invalid.
    pub fn build(self) -> Result<Retriever> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        Ok(Retriever::new(config, embedding_provider))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Provider that counts calls and returns a fixed axis vector per keyword.
    struct AxisProvider {
        calls: AtomicUsize,
    }

    impl EmbeddingProvider for AxisProvider {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let lower = text.to_lowercase();
            let mut v = vec![0.0; 3];
            if lower.contains("tax") {
                v[0] += 1.0;
            }
            if lower.contains("visa") {
                v[1] += 1.0;
            }
            if lower.contains("negative") {
                v[0] -= 1.0;
            }
            if lower.contains("broken") {
                return Err(RagError::EmbeddingError {
                    provider: "Axis".to_string(),
                    message: "broken document".to_string(),
                });
            }
            Ok(v)
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    fn axis_retriever() -> (Retriever, Arc<AxisProvider>) {
        let provider = Arc::new(AxisProvider { calls: AtomicUsize::new(0) });
        let retriever =
            Retriever::builder().embedding_provider(provider.clone()).build().unwrap();
        (retriever, provider)
    }

    #[test]
    fn ranks_matching_document_first() {
        let (retriever, _) = axis_retriever();
        let docs = vec![
            Document::new("Visa rules", "Entry requirements").with_id("visa"),
            Document::new("Tax rules", "Annual filing").with_id("tax"),
        ];

        let results = retriever.find_most_relevant_with("tax question", &docs, 3, 0.3);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document_id.as_deref(), Some("tax"));
        assert!((results[0].similarity_score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn ties_keep_input_order_and_top_k_truncates() {
        let (retriever, _) = axis_retriever();
        let docs = vec![
            Document::new("Tax A", "").with_id("a"),
            Document::new("Tax B", "").with_id("b"),
            Document::new("Tax C", "").with_id("c"),
        ];

        let results = retriever.find_most_relevant_with("tax", &docs, 2, 0.0);
        let ids: Vec<_> = results.iter().filter_map(|r| r.document_id.as_deref()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn negative_correlation_is_floored() {
        let (retriever, _) = axis_retriever();
        let docs = vec![Document::new("negative", "").with_id("neg")];
        let results = retriever.find_most_relevant_with("tax", &docs, 1, 0.0);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].similarity_score, 0.0);
    }

    #[test]
    fn blank_query_or_no_documents_does_no_work() {
        let (retriever, provider) = axis_retriever();
        let docs = vec![Document::new("Tax", "")];
        assert!(retriever.find_most_relevant("   ", &docs).is_empty());
        assert!(retriever.find_most_relevant("tax", &[]).is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_document_text_scores_zero() {
        let (retriever, _) = axis_retriever();
        let docs = vec![Document::default().with_id("empty")];
        assert!(retriever.find_most_relevant_with("tax", &docs, 1, 0.01).is_empty());
        assert_eq!(retriever.find_most_relevant_with("tax", &docs, 1, 0.0).len(), 1);
    }

    #[test]
    fn failing_document_scores_zero_without_fallback() {
        let (retriever, _) = axis_retriever();
        let docs = vec![
            Document::new("broken", "").with_id("broken"),
            Document::new("Tax", "").with_id("tax"),
        ];
        let results = retriever.find_most_relevant_with("tax", &docs, 3, 0.3);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document_id.as_deref(), Some("tax"));
    }

    #[test]
    fn failing_query_returns_first_document_fallback() {
        let (retriever, _) = axis_retriever();
        let docs = vec![Document::new("Visa", "").with_id("first"), Document::new("Tax", "")];

        assert!(retriever.try_find_most_relevant("broken", &docs, 3, 0.3).is_err());

        let results = retriever.find_most_relevant("broken", &docs);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document_id.as_deref(), Some("first"));
        assert!((results[0].similarity_score - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn cache_hits_skip_document_embedding() {
        let (retriever, provider) = axis_retriever();
        let docs = vec![Document::new("Tax", "filing"), Document::new("Visa", "entry")];

        let first = retriever.find_most_relevant_with("tax", &docs, 3, 0.0);
        let calls_after_first = provider.calls.load(Ordering::SeqCst);
        assert_eq!(calls_after_first, 3);

        let second = retriever.find_most_relevant_with("tax", &docs, 3, 0.0);
        assert_eq!(first, second);
        // Only the query is embedded again.
        assert_eq!(provider.calls.load(Ordering::SeqCst), calls_after_first + 1);

        let stats = retriever.cache_stats();
        assert_eq!(stats.cached_similarities, 2);
        assert_eq!((stats.hits, stats.misses), (2, 2));
    }

    #[test]
    fn clear_cache_does_not_change_results() {
        let (retriever, _) = axis_retriever();
        let docs = vec![Document::new("Tax", "filing"), Document::new("Visa", "entry")];
        let before = retriever.find_most_relevant_with("tax visa", &docs, 3, 0.0);

        retriever.clear_cache();
        assert_eq!(retriever.cache_stats().cached_similarities, 0);

        let after = retriever.find_most_relevant_with("tax visa", &docs, 3, 0.0);
        assert_eq!(before, after);
    }

    #[test]
    fn builder_requires_provider_and_valid_config() {
        assert!(matches!(Retriever::builder().build(), Err(RagError::ConfigError(_))));

        let bad = RetrievalConfig { top_k: 0, ..Default::default() };
        let result = Retriever::builder()
            .config(bad)
            .embedding_provider(Arc::new(HashEmbedder::new()))
            .build();
        assert!(result.is_err());
    }
}
