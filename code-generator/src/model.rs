//! The model runtime seam.

use std::{future::Future, pin::Pin};

use ai_llm_service::{AiLlmError, ChatMessage, OllamaService};

/// Boxed future returned by [`ChatModel::chat`].
pub type ChatFuture<'a> = Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>>;

/// A chat-completion backend. One call, no streaming.
pub trait ChatModel: Send + Sync {
    fn chat<'a>(&'a self, messages: &'a [ChatMessage]) -> ChatFuture<'a>;
}

impl ChatModel for OllamaService {
    fn chat<'a>(&'a self, messages: &'a [ChatMessage]) -> ChatFuture<'a> {
        Box::pin(OllamaService::chat(self, messages))
    }
}
