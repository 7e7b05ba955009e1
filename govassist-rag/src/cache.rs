//! Hit/miss accounting and snapshots for the in-process caches.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Debug, Default)]
pub(crate) struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheCounters {
    pub(crate) fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> (u64, u64) {
        (self.hits.load(Ordering::Relaxed), self.misses.load(Ordering::Relaxed))
    }
}

fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 { 0.0 } else { hits as f64 / total as f64 }
}

/// Snapshot of an embedder's text-to-vector cache.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingCacheStats {
    /// Number of cached vectors.
    pub cached_embeddings: usize,
    /// Dimensionality of the cached vectors.
    pub embedding_dimension: usize,
    /// Lookups answered from the cache since the last clear.
    pub hits: u64,
    /// Lookups that had to synthesize a vector since the last clear.
    pub misses: u64,
}

impl EmbeddingCacheStats {
    /// Fraction of lookups answered from the cache, or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        hit_rate(self.hits, self.misses)
    }
}

/// Snapshot of a retriever's (query, document) similarity cache.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SimilarityCacheStats {
    /// Number of cached similarity scores.
    pub cached_similarities: usize,
    /// Lookups answered from the cache since the last clear.
    pub hits: u64,
    /// Lookups that had to embed and score the document since the last clear.
    pub misses: u64,
}

impl SimilarityCacheStats {
    /// Fraction of lookups answered from the cache, or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        hit_rate(self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_is_zero_without_lookups() {
        let stats = SimilarityCacheStats { cached_similarities: 0, hits: 0, misses: 0 };
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn counters_track_and_reset() {
        let counters = CacheCounters::default();
        counters.hit();
        counters.miss();
        counters.miss();
        assert_eq!(counters.snapshot(), (1, 2));

        let stats = EmbeddingCacheStats {
            cached_embeddings: 2,
            embedding_dimension: 8,
            hits: 1,
            misses: 3,
        };
        assert!((stats.hit_rate() - 0.25).abs() < f64::EPSILON);

        counters.reset();
        assert_eq!(counters.snapshot(), (0, 0));
    }
}
