//! Ollama client shared by the snippet store (embeddings) and the code
//! generator (chat).
//!
//! - [`config`]: model configs resolved from environment variables.
//! - [`services::ollama_service`]: thin `reqwest` client for `/api/chat` and `/api/embeddings`.
//! - [`error_handler`]: the crate-wide [`AiLlmError`] and env helpers.
//! - [`telemetry`]: process-wide `tracing` subscriber setup.

pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::{AiLlmError, ConfigError};
pub use services::ollama_service::{ChatMessage, ChatRole, OllamaService};
