//! Default LLM configs loaded from environment variables.
//!
//! Two roles are used by the backend:
//!
//! - **Chat**      → code generation model (`/api/chat`)
//! - **Embedding** → embedding model used by the snippet store
//!
//! # Environment variables
//!
//! - `OLLAMA_URL`          = Ollama base URL (default `http://localhost:11434`)
//! - `OLLAMA_MODEL`        = chat model (default `tinyllama`)
//! - `OLLAMA_TIMEOUT_SECS` = chat timeout in seconds (default `120`)
//! - `LLM_MAX_TOKENS`      = optional `num_predict` for chat (u32)
//! - `EMBEDDING_MODEL`     = embedding model (default `nomic-embed-text`)

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, ConfigError, env_opt_u32, env_or, env_u64_or, validate_http_endpoint,
    },
};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_CHAT_MODEL: &str = "tinyllama";
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// Upper bound for a single chat completion, in seconds.
pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 120;

const EMBEDDING_TIMEOUT_SECS: u64 = 30;

/// Resolves the Ollama base URL from `OLLAMA_URL`.
///
/// # Errors
/// - [`ConfigError::InvalidFormat`] if the value has no http/https scheme
fn ollama_endpoint() -> Result<String, AiLlmError> {
    let url = env_or("OLLAMA_URL", DEFAULT_OLLAMA_URL);
    validate_http_endpoint("OLLAMA_URL", &url)?;
    Ok(url.trim_end_matches('/').to_string())
}

/// Constructs the config for the **chat** (code generation) model.
///
/// # Env
/// - `OLLAMA_URL`, `OLLAMA_MODEL`, `OLLAMA_TIMEOUT_SECS`, `LLM_MAX_TOKENS`
///
/// # Errors
/// - [`ConfigError::InvalidFormat`] for a malformed `OLLAMA_URL`
/// - [`ConfigError::InvalidNumber`] for a malformed timeout or token limit
pub fn config_ollama_chat() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = ollama_endpoint()?;
    let model = env_or("OLLAMA_MODEL", DEFAULT_CHAT_MODEL);
    let timeout_secs = env_u64_or("OLLAMA_TIMEOUT_SECS", DEFAULT_CHAT_TIMEOUT_SECS)?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    chat_config(endpoint, model, timeout_secs, max_tokens)
}

/// Constructs the config for the **embedding** model.
///
/// # Env
/// - `OLLAMA_URL`, `EMBEDDING_MODEL`
pub fn config_ollama_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = ollama_endpoint()?;
    let model = env_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL);

    Ok(LlmModelConfig {
        model,
        endpoint,
        max_tokens: None,
        timeout_secs: EMBEDDING_TIMEOUT_SECS,
    })
}

fn chat_config(
    endpoint: String,
    model: String,
    timeout_secs: u64,
    max_tokens: Option<u32>,
) -> Result<LlmModelConfig, AiLlmError> {
    if model.trim().is_empty() {
        return Err(ConfigError::EmptyModel("OLLAMA_MODEL").into());
    }
    if timeout_secs == 0 {
        return Err(ConfigError::InvalidNumber {
            var: "OLLAMA_TIMEOUT_SECS",
            reason: "must be greater than zero",
        }
        .into());
    }

    // Sampling is left to the model's own defaults.
    Ok(LlmModelConfig {
        model,
        endpoint,
        max_tokens,
        timeout_secs,
    })
}
