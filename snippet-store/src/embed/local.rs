use std::{future::Future, pin::Pin, sync::Arc};

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::debug;

use super::EmbeddingsProvider;
use crate::errors::StoreError;

/// Longest input fed to the model; longer texts are truncated.
const MAX_TOKENS: usize = 256;

/// BERT sentence embedder running on the CPU.
///
/// Mean-pooled, L2-normalized token embeddings. Inference runs on tokio's
/// blocking pool.
#[derive(Clone)]
pub struct LocalEmbedder {
    inner: Arc<Inner>,
}

struct Inner {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl std::fmt::Debug for LocalEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalEmbedder")
            .field("device", &self.inner.device)
            .finish_non_exhaustive()
    }
}

impl LocalEmbedder {
    /// Loads a BERT embedding model from the Hugging Face Hub.
    ///
    /// Blocking: downloads (or reads cached) config, tokenizer and weights.
    ///
    /// # Errors
    /// Returns [`StoreError::EmbedModel`] if download or loading fails.
    pub fn load(repo_id: &str) -> Result<Self, StoreError> {
        let device = Device::Cpu;

        let api = hf_hub::api::sync::Api::new().map_err(|e| {
            StoreError::EmbedModel(format!("failed to create HuggingFace API client: {e}"))
        })?;
        let repo = api.model(repo_id.to_owned());

        let fetch = |file: &str| {
            repo.get(file).map_err(|e| {
                StoreError::EmbedModel(format!("failed to download {file} from {repo_id}: {e}"))
            })
        };
        let config_path = fetch("config.json")?;
        let tokenizer_path = fetch("tokenizer.json")?;
        let weights_path = fetch("model.safetensors")?;

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| StoreError::EmbedModel(format!("failed to read BERT config: {e}")))?;
        let config: BertConfig = serde_json::from_str(&config_str)
            .map_err(|e| StoreError::EmbedModel(format!("invalid BERT config: {e}")))?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| StoreError::EmbedModel(format!("failed to load tokenizer: {e}")))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| StoreError::EmbedModel(format!("tokenizer truncation: {e}")))?;

        // SAFETY: the file was fetched by hf-hub into its cache and is not
        // modified while the VarBuilder maps it.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .map_err(candle_err)?
        };
        let model = BertModel::load(vb, &config).map_err(candle_err)?;

        debug!(repo_id, "BERT embedding model loaded");
        Ok(Self {
            inner: Arc::new(Inner {
                model,
                tokenizer,
                device,
            }),
        })
    }
}

impl Inner {
    fn embed_sync(&self, text: &str) -> Result<Vec<f32>, StoreError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| StoreError::EmbedModel(format!("tokenizer encode failed: {e}")))?;

        let token_ids = encoding.get_ids();
        let token_type_ids = vec![0u32; token_ids.len()];

        let input_ids = Tensor::new(token_ids, &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(candle_err)?;
        let token_type_ids = Tensor::new(token_type_ids.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(candle_err)?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, None)
            .map_err(candle_err)?;

        mean_pool_normalized(&hidden).map_err(candle_err)
    }
}

/// `(1, seq, dim)` hidden states → unit-length `dim` vector.
fn mean_pool_normalized(hidden: &Tensor) -> candle_core::Result<Vec<f32>> {
    let (_, seq_len, _) = hidden.dims3()?;
    let mean = (hidden.sum(1)? / seq_len as f64)?;
    let norm = mean.sqr()?.sum_keepdim(1)?.sqrt()?;
    mean.broadcast_div(&norm)?.squeeze(0)?.to_vec1::<f32>()
}

fn candle_err(e: candle_core::Error) -> StoreError {
    StoreError::EmbedModel(format!("candle: {e}"))
}

impl EmbeddingsProvider for LocalEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_owned();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || inner.embed_sync(&text))
                .await
                .map_err(|e| StoreError::EmbedModel(format!("embedding task failed: {e}")))?
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pooling_averages_tokens_then_normalizes() {
        let hidden = Tensor::new(&[[[1f32, 0.0], [3.0, 4.0]]], &Device::Cpu).unwrap();

        let v = mean_pool_normalized(&hidden).unwrap();

        let half_sqrt2 = std::f32::consts::FRAC_1_SQRT_2;
        assert_eq!(v.len(), 2);
        assert!((v[0] - half_sqrt2).abs() < 1e-6);
        assert!((v[1] - half_sqrt2).abs() < 1e-6);
    }

    #[test]
    fn pooled_vector_has_unit_length() {
        let hidden = Tensor::new(&[[[0.2f32, -1.0, 3.0], [1.5, 0.0, -2.0], [0.1, 0.1, 0.1]]], &Device::Cpu)
            .unwrap();

        let v = mean_pool_normalized(&hidden).unwrap();

        let len: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((len - 1.0).abs() < 1e-5);
    }
}
