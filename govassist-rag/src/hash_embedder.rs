//! Deterministic hash-bag embedder.
//!
//! [`HashEmbedder`] stands in for a trained embedding model. Each
//! whitespace-separated, lower-cased word is bucketed into one dimension by a
//! SHA-256 digest, so the same word always lands in the same dimension across
//! runs and processes. A small amount of Gaussian noise is mixed in to mimic
//! the spread of real embeddings; the per-text cache keeps repeated calls
//! bit-identical.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::cache::{CacheCounters, EmbeddingCacheStats};
use crate::config::RetrievalConfig;
use crate::document::char_prefix;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::similarity::l2_normalize;

const PROVIDER: &str = "HashEmbedder";

/// A cached, hash-bucketed bag-of-words embedder.
///
/// `embed_vector` is total: blank text yields the zero vector and any
/// internal failure is logged and converted to the zero vector.
///
/// # Example
///
/// ```rust,ignore
/// use govassist_rag::HashEmbedder;
///
/// let embedder = HashEmbedder::new().with_seed(7);
/// let v = embedder.embed_vector("How to register a business?");
/// assert_eq!(v.len(), 1024);
/// ```
#[derive(Debug)]
pub struct HashEmbedder {
    dimensions: usize,
    noise_std_dev: f32,
    cache_key_chars: usize,
    cache: RwLock<HashMap<String, Vec<f32>>>,
    counters: CacheCounters,
    rng: Mutex<StdRng>,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::from_config(&RetrievalConfig::default())
    }
}

impl HashEmbedder {
    /// Create an embedder with the default 1024 dimensions and σ = 0.01 noise.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an embedder using the embedding fields of `config`.
    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self {
            dimensions: config.dimensions,
            noise_std_dev: config.noise_std_dev,
            cache_key_chars: config.cache_key_chars,
            cache: RwLock::new(HashMap::new()),
            counters: CacheCounters::default(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seed the noise generator so that fresh instances produce identical vectors.
    pub fn with_seed(self, seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)), ..self }
    }

    /// Embed `text`, never failing.
    ///
    /// Returns the zero vector for empty or whitespace-only text, the cached
    /// vector when the text's cache key has been seen before, and otherwise a
    /// freshly synthesized unit vector (which is then cached).
    pub fn embed_vector(&self, text: &str) -> Vec<f32> {
        if text.trim().is_empty() {
            return self.zero_vector();
        }

        let key = self.cache_key(text);
        if let Some(cached) = self.read_cache().get(&key) {
            self.counters.hit();
            return cached.clone();
        }
        self.counters.miss();

        match self.synthesize(text) {
            Ok(embedding) => {
                debug!(key_len = key.len(), "cached new embedding");
                self.write_cache().entry(key).or_insert(embedding).clone()
            }
            Err(e) => {
                warn!(error = %e, "embedding synthesis failed, using zero vector");
                self.zero_vector()
            }
        }
    }

    /// Embed each text in order. An empty slice yields an empty result.
    pub fn embed_vectors(&self, texts: &[&str]) -> Vec<Vec<f32>> {
        texts.iter().map(|text| self.embed_vector(text)).collect()
    }

    /// Remove every cached vector and reset the hit/miss counters.
    pub fn clear_cache(&self) {
        self.write_cache().clear();
        self.counters.reset();
        info!("cleared embedding cache");
    }

    /// Report the cache size, vector dimensionality, and hit/miss counts.
    pub fn cache_stats(&self) -> EmbeddingCacheStats {
        let (hits, misses) = self.counters.snapshot();
        EmbeddingCacheStats {
            cached_embeddings: self.read_cache().len(),
            embedding_dimension: self.dimensions,
            hits,
            misses,
        }
    }

    fn zero_vector(&self) -> Vec<f32> {
        vec![0.0; self.dimensions]
    }

    fn cache_key(&self, text: &str) -> String {
        char_prefix(text, self.cache_key_chars).to_lowercase().trim().to_string()
    }

    fn synthesize(&self, text: &str) -> Result<Vec<f32>> {
        if self.dimensions == 0 {
            return Err(embedding_error("dimensions must be greater than zero"));
        }

        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();
        let weight = 1.0 / (words.len() as f32 + 1.0);

        let mut embedding = vec![0.0f32; self.dimensions];
        for word in &words {
            embedding[bucket(word, self.dimensions)] += weight;
        }
        l2_normalize(&mut embedding);

        if !self.noise_std_dev.is_finite() || self.noise_std_dev < 0.0 {
            return Err(embedding_error(format!(
                "invalid noise standard deviation {}",
                self.noise_std_dev
            )));
        }
        if self.noise_std_dev > 0.0 {
            let mut rng =
                self.rng.lock().map_err(|_| embedding_error("noise generator lock poisoned"))?;
            for value in embedding.iter_mut() {
                *value += gaussian(&mut rng, self.noise_std_dev);
            }
            l2_normalize(&mut embedding);
        }

        if embedding.iter().any(|v| !v.is_finite()) {
            return Err(embedding_error("synthesized vector contains non-finite values"));
        }
        Ok(embedding)
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Vec<f32>>> {
        // Entries are inserted whole, so a poisoned map is still consistent.
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Vec<f32>>> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_vector(text))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(self.embed_vectors(texts))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Map a word to a dimension index with a hash that is stable across runs.
fn bucket(word: &str, dimensions: usize) -> usize {
    let digest = Sha256::digest(word.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) % dimensions as u64) as usize
}

/// Draw one zero-mean normal sample (Box-Muller).
fn gaussian(rng: &mut StdRng, std_dev: f32) -> f32 {
    let u1: f32 = rng.gen_range(f32::EPSILON..=1.0);
    let u2: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
    std_dev * (-2.0 * u1.ln()).sqrt() * u2.cos()
}

fn embedding_error(message: impl Into<String>) -> RagError {
    RagError::EmbeddingError { provider: PROVIDER.to_string(), message: message.into() }
}
