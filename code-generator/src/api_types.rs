//! Request and result types of a generation.

use ai_llm_service::AiLlmError;
use serde::{Deserialize, Serialize};

/// Prefix of the legacy `output` string when the model call failed.
pub const MODEL_ERROR_PREFIX: &str = "Error calling Ollama: ";

pub const DEFAULT_N_RESULTS: u64 = 3;

fn default_n_results() -> u64 {
    DEFAULT_N_RESULTS
}

/// A generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Natural-language description of the code to produce.
    pub prompt: String,
    /// Optional hint such as `html` or `python`.
    #[serde(default)]
    pub code_type: Option<String>,
    /// How many snippets to retrieve as context.
    #[serde(default = "default_n_results")]
    pub n_results: u64,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            code_type: None,
            n_results: DEFAULT_N_RESULTS,
        }
    }
}

/// Why the model call did not produce text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationFailure {
    /// Stable, machine-readable code (e.g. `MODEL_TIMEOUT`).
    pub code: &'static str,
    /// Human-readable detail from the client error.
    pub message: String,
}

impl From<&AiLlmError> for GenerationFailure {
    fn from(err: &AiLlmError) -> Self {
        let code = match err {
            AiLlmError::Timeout(_) => "MODEL_TIMEOUT",
            AiLlmError::HttpTransport(_) => "MODEL_UNREACHABLE",
            AiLlmError::HttpStatus { .. } => "MODEL_HTTP_STATUS",
            AiLlmError::Decode(_) => "MODEL_BAD_RESPONSE",
            AiLlmError::Config(_) => "MODEL_CONFIG",
            _ => "MODEL_ERROR",
        };
        Self {
            code,
            message: err.to_string(),
        }
    }
}

/// Result of the model call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Completed(String),
    Failed(GenerationFailure),
}

impl GenerationOutcome {
    /// Text for the `output` field: the generated code, or
    /// `"Error calling Ollama: <detail>"` when the call failed.
    pub fn output(&self) -> String {
        match self {
            GenerationOutcome::Completed(text) => text.clone(),
            GenerationOutcome::Failed(f) => format!("{MODEL_ERROR_PREFIX}{}", f.message),
        }
    }

    pub fn failure(&self) -> Option<&GenerationFailure> {
        match self {
            GenerationOutcome::Completed(_) => None,
            GenerationOutcome::Failed(f) => Some(f),
        }
    }
}

/// Everything one generation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub outcome: GenerationOutcome,
    /// Retrieved snippet texts, in the order the store ranked them.
    pub used_context: Vec<String>,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn request_defaults() {
        let req: GenerateRequest = serde_json::from_str(r#"{"prompt":"a form"}"#).unwrap();
        assert_eq!(req, GenerateRequest::new("a form"));
        assert_eq!(req.n_results, 3);

        let req: GenerateRequest =
            serde_json::from_str(r#"{"prompt":"x","code_type":"html","n_results":1}"#).unwrap();
        assert_eq!(req.code_type.as_deref(), Some("html"));
        assert_eq!(req.n_results, 1);
    }

    #[test]
    fn request_requires_prompt_and_non_negative_count() {
        assert!(serde_json::from_str::<GenerateRequest>(r#"{"code_type":"html"}"#).is_err());
        assert!(serde_json::from_str::<GenerateRequest>(r#"{"prompt":"x","n_results":-1}"#).is_err());
    }

    #[test]
    fn failed_outcome_renders_legacy_prefix() {
        let failure = GenerationFailure::from(&AiLlmError::Timeout(Duration::from_secs(120)));
        assert_eq!(failure.code, "MODEL_TIMEOUT");

        let outcome = GenerationOutcome::Failed(failure);
        assert!(outcome.output().starts_with("Error calling Ollama: "));
        assert!(outcome.output().contains("timed out"));
        assert!(outcome.failure().is_some());
    }

    #[test]
    fn completed_outcome_is_the_text() {
        let outcome = GenerationOutcome::Completed("<div></div>".into());
        assert_eq!(outcome.output(), "<div></div>");
        assert!(outcome.failure().is_none());
    }
}
