//! Typed error for the code-generator crate.

use thiserror::Error;

/// Failures that abort a generation request.
///
/// Model runtime failures are not errors here: they are reported through
/// [`crate::GenerationOutcome::Failed`].
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The request was rejected before any I/O.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Errors from the snippet store (query or embedding).
    #[error("snippet store error: {0}")]
    Store(#[from] snippet_store::StoreError),
}
