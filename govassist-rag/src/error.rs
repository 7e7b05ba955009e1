//! Error types for the `govassist-rag` crate.
//!
//! Most of these never reach callers of the public scoring API: embedding
//! and retrieval absorb failures into documented defaults. They surface
//! through the strict `try_*` entry points and through configuration.

use thiserror::Error;

/// Errors that can occur while embedding, scoring, or attributing.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// Similarity scoring or ranking failed for a whole query.
    #[error("Retrieval error: {0}")]
    RetrievalError(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An attribution record violated its invariants.
    #[error("Attribution error: {0}")]
    AttributionError(String),

    /// A document could not be scored for relevance.
    #[error("Relevance error: {0}")]
    RelevanceError(String),

    /// A document or configuration payload could not be decoded.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
