use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use code_generator::GeneratorError;
use serde::Serialize;
use thiserror::Error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Http { status, .. } => *status,
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Http { code, .. } => code,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

/// Snippet store failures abort the request with a 500; invalid requests are 400.
impl From<GeneratorError> for AppError {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::InvalidRequest(msg) => AppError::BadRequest(msg),
            GeneratorError::Store(e) => AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "SNIPPET_STORE_ERROR",
                message: format!("Snippet store request failed: {e}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use snippet_store::StoreError;

    use super::*;

    #[test]
    fn store_failure_maps_to_500() {
        let err = AppError::from(GeneratorError::Store(StoreError::Qdrant("down".into())));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "SNIPPET_STORE_ERROR");
    }

    #[test]
    fn invalid_request_maps_to_400() {
        let err = AppError::from(GeneratorError::InvalidRequest("n_results".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "BAD_REQUEST");
    }

    #[test]
    fn listener_failures_are_server_errors() {
        let err = AppError::Bind(std::io::Error::from(std::io::ErrorKind::AddrInUse));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "BIND_ERROR");
    }
}
