/// Configuration for one Ollama model invocation profile.
///
/// The same shape is used for the chat model (code generation) and the
/// embedding model (snippet store); only the fields relevant to the call
/// being made are sent upstream.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmModelConfig;
///
/// let cfg = LlmModelConfig {
///     model: "tinyllama".to_string(),
///     endpoint: "http://localhost:11434".to_string(),
///     max_tokens: None,
///     timeout_secs: 120,
/// };
/// assert_eq!(cfg.timeout_secs, 120);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Model identifier string (e.g., `"tinyllama"`, `"nomic-embed-text"`).
    pub model: String,

    /// Ollama base URL (e.g., `http://localhost:11434`).
    pub endpoint: String,

    /// Maximum number of tokens to generate (`num_predict`).
    pub max_tokens: Option<u32>,

    /// Request timeout in seconds; bounds every call made with this config.
    pub timeout_secs: u64,
}
