//! Embedding provider trait for generating vector embeddings from text.

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// The default [`embed_batch`](EmbeddingProvider::embed_batch) implementation
/// calls [`embed`](EmbeddingProvider::embed) sequentially and preserves input
/// order; backends that support native batching should override it.
///
/// # Example
///
/// ```rust,ignore
/// use govassist_rag::{EmbeddingProvider, HashEmbedder};
///
/// let provider = HashEmbedder::new();
/// let embedding = provider.embed("hello world")?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text)?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}
