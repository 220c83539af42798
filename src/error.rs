use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// A single malformed batch entry.
    #[error("{0}")]
    Validation(String),

    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;

impl ResponseError for ReconcileError {
    fn status_code(&self) -> StatusCode {
        match self {
            ReconcileError::NotFound(_) => StatusCode::NOT_FOUND,
            ReconcileError::BadRequest(_) | ReconcileError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ReconcileError::SourceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ReconcileError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ReconcileError::Database(e) => {
                tracing::error!(error = %e, "Database failure");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}
