use code_generator::{Generation, GenerationFailure};
use serde::Serialize;

/// Response payload for /api/generate.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Generated code, or `"Error calling Ollama: ..."` when the model call failed.
    pub output: String,
    /// Snippet texts given to the model, in retrieval order.
    pub used_context: Vec<String>,
    /// Present only when the model call failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<GenerationFailure>,
}

impl From<Generation> for GenerateResponse {
    fn from(g: Generation) -> Self {
        Self {
            output: g.outcome.output(),
            error: g.outcome.failure().cloned(),
            used_context: g.used_context,
        }
    }
}
