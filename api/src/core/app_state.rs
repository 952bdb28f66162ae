use code_generator::CodeGenerator;

/// Shared state for all HTTP handlers.
///
/// Built once in `main` and shared behind an `Arc`; handlers never mutate it.
#[derive(Clone)]
pub struct AppState {
    /// Retrieval + prompt assembly + model call.
    pub generator: CodeGenerator,
}

impl AppState {
    pub fn new(generator: CodeGenerator) -> Self {
        Self { generator }
    }
}
