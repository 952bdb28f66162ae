//! Embedding providers used to vectorize documents and queries.
//!
//! - [`LocalEmbedder`]: in-process BERT sentence embeddings (default)
//! - [`OllamaEmbedder`]: Ollama `/api/embeddings`

mod local;
mod ollama;

pub use local::LocalEmbedder;
pub use ollama::OllamaEmbedder;

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::{OllamaService, config::default_config::config_ollama_embedding};
use tracing::info;

use crate::config::EmbedderKind;
use crate::errors::StoreError;

/// Provider interface for embedding generation.
///
/// Async because real providers either perform HTTP requests or run a model
/// on the blocking pool.
pub trait EmbeddingsProvider: Send + Sync {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>>;
}

/// Builds the provider selected by `kind`.
///
/// The local model is downloaded from the Hugging Face Hub on first use and
/// cached afterwards.
///
/// # Errors
/// - [`StoreError::EmbedModel`] if the local model cannot be fetched or loaded
/// - [`StoreError::Embedding`] if the Ollama embedding config is invalid
pub async fn build_embedder(kind: &EmbedderKind) -> Result<Arc<dyn EmbeddingsProvider>, StoreError> {
    match kind {
        EmbedderKind::Local { model_id } => {
            let id = model_id.clone();
            let embedder = tokio::task::spawn_blocking(move || LocalEmbedder::load(&id))
                .await
                .map_err(|e| StoreError::EmbedModel(format!("model load task failed: {e}")))??;
            info!(model = %model_id, "local embedder ready");
            Ok(Arc::new(embedder))
        }
        EmbedderKind::Ollama => {
            let cfg = config_ollama_embedding()?;
            info!(model = %cfg.model, endpoint = %cfg.endpoint, "ollama embedder ready");
            let svc = OllamaService::new(cfg)?;
            Ok(Arc::new(OllamaEmbedder::new(Arc::new(svc))))
        }
    }
}
