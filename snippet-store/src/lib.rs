//! Snippet store: code examples in a Qdrant collection.
//!
//! Vectors come from an in-process BERT model by default, so retrieval does
//! not depend on the model runtime; Ollama embeddings are opt-in.
//!
//! This crate provides:
//! - [`SnippetStore`], the seam the generator talks to (count / upsert / query)
//! - [`QdrantSnippetStore`], the production implementation
//! - [`seed::ensure_seeded`], one-shot population with built-in examples

mod config;
mod embed;
mod errors;
mod qdrant_facade;
mod record;
pub mod seed;

pub use config::{
    DEFAULT_COLLECTION, DEFAULT_LOCAL_EMBEDDING_MODEL, DEFAULT_QDRANT_URL, EmbedderKind,
    StoreConfig,
};
pub use embed::{EmbeddingsProvider, LocalEmbedder, OllamaEmbedder, build_embedder};
pub use errors::StoreError;
pub use record::{Document, SnippetHit};
pub use seed::{SeedOutcome, ensure_seeded};

use std::{future::Future, pin::Pin, sync::Arc};

use tracing::{debug, instrument, trace};

/// Boxed future returned by [`SnippetStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// A persistent collection of documents queryable by text similarity.
pub trait SnippetStore: Send + Sync {
    /// Number of stored documents.
    fn count(&self) -> StoreFuture<'_, u64>;

    /// Inserts or replaces documents by id. Returns how many were written.
    fn upsert<'a>(&'a self, docs: &'a [Document]) -> StoreFuture<'a, usize>;

    /// At most `n_results` documents most similar to `text`, best first.
    fn query<'a>(&'a self, text: &'a str, n_results: u64) -> StoreFuture<'a, Vec<SnippetHit>>;
}

/// [`SnippetStore`] over a Qdrant collection.
///
/// Embeddings for both documents and queries come from the same provider, so
/// the collection's vector size is whatever that model produces.
pub struct QdrantSnippetStore {
    client: qdrant_facade::QdrantFacade,
    embedder: Arc<dyn EmbeddingsProvider>,
}

impl QdrantSnippetStore {
    /// Constructs a new store from the given configuration.
    ///
    /// # Errors
    /// Returns `StoreError::Config` / `StoreError::Qdrant` if the client
    /// cannot be built.
    pub fn new(cfg: &StoreConfig, embedder: Arc<dyn EmbeddingsProvider>) -> Result<Self, StoreError> {
        trace!("QdrantSnippetStore::new collection={}", cfg.collection);
        let client = qdrant_facade::QdrantFacade::new(cfg)?;
        Ok(Self { client, embedder })
    }

    async fn embed_all(&self, docs: &[Document]) -> Result<Vec<(Document, Vec<f32>)>, StoreError> {
        let mut out: Vec<(Document, Vec<f32>)> = Vec::with_capacity(docs.len());
        for doc in docs {
            let vector = self.embedder.embed(&doc.text).await?;
            if let Some((_, first)) = out.first() {
                if first.len() != vector.len() {
                    return Err(StoreError::VectorSizeMismatch {
                        got: vector.len(),
                        want: first.len(),
                    });
                }
            }
            out.push((doc.clone(), vector));
        }
        Ok(out)
    }

    #[instrument(skip_all, fields(collection = %self.client.collection(), n_results = n_results))]
    async fn query_inner(&self, text: &str, n_results: u64) -> Result<Vec<SnippetHit>, StoreError> {
        if n_results == 0 || !self.client.collection_exists().await? {
            debug!("nothing to search, returning no hits");
            return Ok(Vec::new());
        }

        let vector = self.embedder.embed(text).await?;
        self.client.search(vector, n_results).await
    }
}

impl SnippetStore for QdrantSnippetStore {
    fn count(&self) -> StoreFuture<'_, u64> {
        Box::pin(async move { self.client.count().await })
    }

    fn upsert<'a>(&'a self, docs: &'a [Document]) -> StoreFuture<'a, usize> {
        Box::pin(async move {
            let batch = self.embed_all(docs).await?;
            let Some((_, first)) = batch.first() else {
                return Ok(0);
            };
            self.client.ensure_collection(first.len()).await?;
            self.client.upsert(batch).await
        })
    }

    fn query<'a>(&'a self, text: &'a str, n_results: u64) -> StoreFuture<'a, Vec<SnippetHit>> {
        Box::pin(self.query_inner(text, n_results))
    }
}
