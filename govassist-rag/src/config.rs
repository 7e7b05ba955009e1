//! Configuration for embedding, retrieval, and attribution.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters shared by the embedder, retriever, and
/// attribution tracker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Dimensionality of generated embedding vectors.
    pub dimensions: usize,
    /// Standard deviation of the Gaussian noise added to each dimension.
    pub noise_std_dev: f32,
    /// Number of leading characters of the text used as the embedding cache key.
    pub cache_key_chars: usize,
    /// Number of top results to return from a query.
    pub top_k: usize,
    /// Minimum similarity score for results (results below this are filtered out).
    pub similarity_threshold: f32,
    /// Maximum number of content characters included in a document's extracted text.
    pub max_content_chars: usize,
    /// Metadata string values must be shorter than this to be included in extracted text.
    pub max_metadata_value_chars: usize,
    /// Number of content characters included in a document's similarity cache key.
    pub document_key_chars: usize,
    /// Score attached to the degraded single-document result returned on failure.
    pub fallback_score: f32,
    /// Keyword-overlap score a keyword fallback attribution must exceed.
    pub keyword_min_score: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            dimensions: 1024,
            noise_std_dev: 0.01,
            cache_key_chars: 100,
            top_k: 3,
            similarity_threshold: 0.3,
            max_content_chars: 500,
            max_metadata_value_chars: 100,
            document_key_chars: 50,
            fallback_score: 0.1,
            keyword_min_score: 0.1,
        }
    }
}

impl RetrievalConfig {
    /// Create a new builder for constructing a [`RetrievalConfig`].
    pub fn builder() -> RetrievalConfigBuilder {
        RetrievalConfigBuilder::default()
    }

    /// Decode a configuration from JSON and validate it.
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RetrievalConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `dimensions == 0`
    /// - `top_k == 0`
    /// - `similarity_threshold`, `fallback_score`, or `keyword_min_score` is outside `[0, 1]`
    /// - `noise_std_dev` is negative or not finite
    pub fn validate(&self) -> Result<()> {
        if self.dimensions == 0 {
            return Err(RagError::ConfigError("dimensions must be greater than zero".to_string()));
        }
        if self.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        check_unit_interval("similarity_threshold", self.similarity_threshold)?;
        check_unit_interval("fallback_score", self.fallback_score)?;
        check_unit_interval("keyword_min_score", self.keyword_min_score)?;
        if !self.noise_std_dev.is_finite() || self.noise_std_dev < 0.0 {
            return Err(RagError::ConfigError(format!(
                "noise_std_dev ({}) must be a finite non-negative number",
                self.noise_std_dev
            )));
        }
        Ok(())
    }
}

fn check_unit_interval(name: &str, value: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(RagError::ConfigError(format!("{name} ({value}) must be within [0, 1]")));
    }
    Ok(())
}

/// Builder for constructing a validated [`RetrievalConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetrievalConfigBuilder {
    config: RetrievalConfig,
}

impl RetrievalConfigBuilder {
    /// Set the embedding dimensionality.
    pub fn dimensions(mut self, dimensions: usize) -> Self {
        self.config.dimensions = dimensions;
        self
    }

    /// Set the standard deviation of the per-dimension embedding noise.
    pub fn noise_std_dev(mut self, std_dev: f32) -> Self {
        self.config.noise_std_dev = std_dev;
        self
    }

    /// Set the number of top results to return from a query.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the minimum similarity threshold for filtering results.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Set the maximum number of content characters used for document text.
    pub fn max_content_chars(mut self, chars: usize) -> Self {
        self.config.max_content_chars = chars;
        self
    }

    /// Set the score of the degraded fallback result.
    pub fn fallback_score(mut self, score: f32) -> Self {
        self.config.fallback_score = score;
        self
    }

    /// Set the minimum score for keyword fallback attributions.
    pub fn keyword_min_score(mut self, score: f32) -> Self {
        self.config.keyword_min_score = score;
        self
    }

    /// Build the [`RetrievalConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] under the conditions listed on
    /// [`RetrievalConfig::validate`].
    pub fn build(self) -> Result<RetrievalConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
