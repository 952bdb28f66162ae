//! Retrieval-augmented code generation.
//!
//! Public API: [`CodeGenerator::generate`]. It queries the snippet store for
//! the snippets most similar to the prompt, wraps them into a fixed
//! `(system, user)` message pair and makes a single chat call. Store failures
//! abort the request; model failures are returned as
//! [`GenerationOutcome::Failed`] together with the retrieved context.

mod api_types;
mod error;
pub mod model;
pub mod prompt;

pub use api_types::{
    DEFAULT_N_RESULTS, GenerateRequest, Generation, GenerationFailure, GenerationOutcome,
    MODEL_ERROR_PREFIX,
};
pub use error::GeneratorError;
pub use model::ChatModel;

use std::sync::Arc;

use snippet_store::SnippetStore;
use tracing::{debug, info, instrument, warn};

/// Orchestrates retrieval, prompt assembly and the model call.
///
/// Holds only shared handles, so one instance serves every request.
#[derive(Clone)]
pub struct CodeGenerator {
    store: Arc<dyn SnippetStore>,
    model: Arc<dyn ChatModel>,
}

impl CodeGenerator {
    pub fn new(store: Arc<dyn SnippetStore>, model: Arc<dyn ChatModel>) -> Self {
        Self { store, model }
    }

    /// Runs one generation.
    ///
    /// # Errors
    /// - [`GeneratorError::InvalidRequest`] if `n_results` is zero
    /// - [`GeneratorError::Store`] if the similarity query fails
    #[instrument(skip_all, fields(n_results = req.n_results, code_type = ?req.code_type))]
    pub async fn generate(&self, req: &GenerateRequest) -> Result<Generation, GeneratorError> {
        if req.n_results == 0 {
            return Err(GeneratorError::InvalidRequest(
                "n_results must be at least 1".into(),
            ));
        }

        // 1) Retrieve
        let hits = self.store.query(&req.prompt, req.n_results).await?;
        let used_context: Vec<String> = hits.into_iter().map(|h| h.text).collect();
        debug!(retrieved = used_context.len(), "snippets retrieved");

        // 2) Build prompts
        let contexts_text = prompt::join_contexts(&used_context);
        let messages = prompt::build_messages(&req.prompt, req.code_type.as_deref(), &contexts_text);

        // 3) Chat
        let outcome = match self.model.chat(&messages).await {
            Ok(text) => {
                info!(chars = text.len(), "generation completed");
                GenerationOutcome::Completed(text)
            }
            Err(err) => {
                warn!(error = %err, "model call failed");
                GenerationOutcome::Failed(GenerationFailure::from(&err))
            }
        };

        Ok(Generation {
            outcome,
            used_context,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use ai_llm_service::{AiLlmError, ChatMessage, ChatRole};
    use snippet_store::{Document, SnippetHit, StoreError, StoreFuture};

    use super::*;
    use crate::model::ChatFuture;

    /// Returns its fixed hits in order, truncated to `n_results`.
    struct FixedStore {
        hits: Vec<&'static str>,
        queries: Mutex<Vec<(String, u64)>>,
    }

    impl FixedStore {
        fn new(hits: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                hits,
                queries: Mutex::new(Vec::new()),
            })
        }
    }

    impl SnippetStore for FixedStore {
        fn count(&self) -> StoreFuture<'_, u64> {
            let n = self.hits.len() as u64;
            Box::pin(async move { Ok(n) })
        }

        fn upsert<'a>(&'a self, docs: &'a [Document]) -> StoreFuture<'a, usize> {
            Box::pin(async move { Ok(docs.len()) })
        }

        fn query<'a>(&'a self, text: &'a str, n_results: u64) -> StoreFuture<'a, Vec<SnippetHit>> {
            Box::pin(async move {
                self.queries.lock().unwrap().push((text.to_string(), n_results));
                Ok(self
                    .hits
                    .iter()
                    .take(n_results as usize)
                    .enumerate()
                    .map(|(i, t)| SnippetHit {
                        id: format!("doc-{i}"),
                        text: t.to_string(),
                        score: 1.0 - i as f32 * 0.1,
                        metadata: BTreeMap::new(),
                    })
                    .collect())
            })
        }
    }

    struct DownStore;

    impl SnippetStore for DownStore {
        fn count(&self) -> StoreFuture<'_, u64> {
            Box::pin(async { Err(StoreError::Qdrant("unavailable".into())) })
        }

        fn upsert<'a>(&'a self, _docs: &'a [Document]) -> StoreFuture<'a, usize> {
            Box::pin(async { Err(StoreError::Qdrant("unavailable".into())) })
        }

        fn query<'a>(&'a self, _text: &'a str, _n: u64) -> StoreFuture<'a, Vec<SnippetHit>> {
            Box::pin(async { Err(StoreError::Qdrant("unavailable".into())) })
        }
    }

    /// Records every message list; answers with `reply` or a timeout.
    struct RecordingModel {
        reply: Option<&'static str>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl RecordingModel {
        fn answering(reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn timing_out() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl ChatModel for RecordingModel {
        fn chat<'a>(&'a self, messages: &'a [ChatMessage]) -> ChatFuture<'a> {
            self.seen.lock().unwrap().push(messages.to_vec());
            let reply = self.reply;
            Box::pin(async move {
                reply
                    .map(str::to_string)
                    .ok_or(AiLlmError::Timeout(Duration::from_secs(120)))
            })
        }
    }

    fn request(prompt: &str, code_type: Option<&str>, n_results: u64) -> GenerateRequest {
        GenerateRequest {
            prompt: prompt.into(),
            code_type: code_type.map(str::to_string),
            n_results,
        }
    }

    #[tokio::test]
    async fn used_context_is_exactly_the_query_result() {
        let store = FixedStore::new(vec!["html page", "fetch example", "fastapi app"]);
        let model = RecordingModel::answering("<form></form>");
        let generator = CodeGenerator::new(store.clone(), model.clone());

        let out = generator
            .generate(&request("address form", Some("html"), 2))
            .await
            .unwrap();

        assert_eq!(out.used_context, vec!["html page", "fetch example"]);
        assert_eq!(out.outcome, GenerationOutcome::Completed("<form></form>".into()));
        assert_eq!(
            store.queries.lock().unwrap().as_slice(),
            &[("address form".to_string(), 2)]
        );
    }

    #[tokio::test]
    async fn context_never_exceeds_request_or_store_size() {
        let store = FixedStore::new(vec!["a", "b"]);
        let generator = CodeGenerator::new(store, RecordingModel::answering("ok"));

        for k in 1..=5u64 {
            let out = generator.generate(&request("x", None, k)).await.unwrap();
            assert!(out.used_context.len() as u64 <= k);
            assert!(out.used_context.len() <= 2);
        }
    }

    #[tokio::test]
    async fn sends_exact_system_and_user_messages() {
        let store = FixedStore::new(vec!["SNIPPET ONE", "SNIPPET TWO"]);
        let model = RecordingModel::answering("code");
        let generator = CodeGenerator::new(store, model.clone());

        let req = request("Create a simple Node.js Express server", Some("node"), 3);
        generator.generate(&req).await.unwrap();
        generator.generate(&req).await.unwrap();

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], seen[1]);

        let messages = &seen[0];
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[0].content, prompt::SYSTEM_MESSAGE);
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(
            messages[1].content,
            "User request:\nCreate a simple Node.js Express server\n\n\
             Code type: node\n\n\
             Relevant snippets from the knowledge base:\n\
             SNIPPET ONE\n\n---\n\nSNIPPET TWO\n\n\
             Now generate the best possible code for the user. \n\
             Respond with ONLY code and minimal comments.\n"
        );
    }

    #[tokio::test]
    async fn omitted_code_type_is_unspecified() {
        let model = RecordingModel::answering("code");
        let generator = CodeGenerator::new(FixedStore::new(vec!["a"]), model.clone());

        generator.generate(&request("x", None, 3)).await.unwrap();

        let seen = model.seen.lock().unwrap();
        assert!(seen[0][1].content.contains("unspecified"));
    }

    #[tokio::test]
    async fn empty_store_means_empty_context() {
        let model = RecordingModel::answering("code");
        let generator = CodeGenerator::new(FixedStore::new(vec![]), model.clone());

        let out = generator.generate(&request("x", None, 3)).await.unwrap();

        assert!(out.used_context.is_empty());
        let seen = model.seen.lock().unwrap();
        assert!(
            seen[0][1]
                .content
                .contains("Relevant snippets from the knowledge base:\n\n\nNow generate")
        );
    }

    #[tokio::test]
    async fn model_failure_keeps_context_and_reports_error() {
        let store = FixedStore::new(vec!["a", "b", "c"]);
        let generator = CodeGenerator::new(store, RecordingModel::timing_out());

        let out = generator.generate(&request("x", None, 3)).await.unwrap();

        assert_eq!(out.used_context, vec!["a", "b", "c"]);
        assert!(out.outcome.output().starts_with("Error calling Ollama: "));
        assert_eq!(out.outcome.failure().map(|f| f.code), Some("MODEL_TIMEOUT"));
    }

    #[tokio::test]
    async fn store_failure_is_an_error() {
        let model = RecordingModel::answering("code");
        let generator = CodeGenerator::new(Arc::new(DownStore), model.clone());

        let err = generator.generate(&request("x", None, 3)).await.unwrap_err();

        assert!(matches!(err, GeneratorError::Store(_)));
        assert!(model.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn zero_results_is_rejected_before_any_io() {
        let store = FixedStore::new(vec!["a"]);
        let generator = CodeGenerator::new(store.clone(), RecordingModel::answering("code"));

        let err = generator.generate(&request("x", None, 0)).await.unwrap_err();

        assert!(matches!(err, GeneratorError::InvalidRequest(_)));
        assert!(store.queries.lock().unwrap().is_empty());
    }
}
