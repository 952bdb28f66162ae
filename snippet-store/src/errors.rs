//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for snippet-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Embedding provider failed for the given text.
    #[error("embedding error: {0}")]
    Embedding(#[from] ai_llm_service::AiLlmError),

    /// Local embedding model could not be loaded or run.
    #[error("embedding model error: {0}")]
    EmbedModel(String),

    /// Mismatch in vector dimensionality across documents.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),
}
