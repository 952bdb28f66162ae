use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::OllamaService;

use super::EmbeddingsProvider;
use crate::errors::StoreError;

/// Ollama embedding provider backed by a shared [`OllamaService`].
///
/// With this backend the store depends on the model runtime: an unreachable
/// Ollama fails queries as [`StoreError::Embedding`].
#[derive(Clone)]
pub struct OllamaEmbedder {
    svc: Arc<OllamaService>,
}

impl OllamaEmbedder {
    pub fn new(svc: Arc<OllamaService>) -> Self {
        Self { svc }
    }
}

impl EmbeddingsProvider for OllamaEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.svc.embeddings(text).await?) })
    }
}
