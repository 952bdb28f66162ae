//! Store location and collection configuration.

use crate::errors::StoreError;

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_COLLECTION: &str = "code_snippets";

/// Hugging Face model loaded by the local embedder when none is configured.
pub const DEFAULT_LOCAL_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Where document and query vectors come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmbedderKind {
    /// In-process BERT model; the store works without the model runtime.
    Local { model_id: String },
    /// Ollama `/api/embeddings` (`OLLAMA_URL` + `EMBEDDING_MODEL`).
    Ollama,
}

impl EmbedderKind {
    /// Parses an `EMBEDDING_BACKEND` value (`local` or `ollama`, case-insensitive).
    pub fn parse(backend: &str, local_model_id: &str) -> Result<Self, StoreError> {
        match backend.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local {
                model_id: local_model_id.trim().to_string(),
            }),
            "ollama" => Ok(Self::Ollama),
            other => Err(StoreError::Config(format!(
                "EMBEDDING_BACKEND must be `local` or `ollama`, got `{other}`"
            ))),
        }
    }
}

/// Configuration of the snippet collection.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Embedding backend for documents and queries.
    pub embedder: EmbedderKind,
}

impl StoreConfig {
    /// Creates a default config for a given Qdrant endpoint and collection name.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            embedder: EmbedderKind::Local {
                model_id: DEFAULT_LOCAL_EMBEDDING_MODEL.to_string(),
            },
        }
    }

    /// Reads `QDRANT_URL`, `QDRANT_API_KEY`, `QDRANT_COLLECTION`,
    /// `EMBEDDING_BACKEND` and `LOCAL_EMBEDDING_MODEL`.
    ///
    /// # Errors
    /// Returns `StoreError::Config` if the resulting config is invalid.
    pub fn from_env() -> Result<Self, StoreError> {
        let mut cfg = Self::new_default(
            env_or("QDRANT_URL", DEFAULT_QDRANT_URL),
            env_or("QDRANT_COLLECTION", DEFAULT_COLLECTION),
        );
        cfg.qdrant_api_key = std::env::var("QDRANT_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        cfg.embedder = EmbedderKind::parse(
            &env_or("EMBEDDING_BACKEND", "local"),
            &env_or("LOCAL_EMBEDDING_MODEL", DEFAULT_LOCAL_EMBEDDING_MODEL),
        )?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(StoreError::Config("qdrant_url is empty".into()));
        }
        if !(self.qdrant_url.starts_with("http://") || self.qdrant_url.starts_with("https://")) {
            return Err(StoreError::Config(format!(
                "qdrant_url must start with http:// or https://, got `{}`",
                self.qdrant_url
            )));
        }
        if self.collection.trim().is_empty() {
            return Err(StoreError::Config("collection is empty".into()));
        }
        if let EmbedderKind::Local { model_id } = &self.embedder {
            if model_id.is_empty() {
                return Err(StoreError::Config("local embedding model id is empty".into()));
            }
        }
        Ok(())
    }
}

fn env_or(k: &str, dflt: &str) -> String {
    std::env::var(k)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| dflt.to_string())
}
