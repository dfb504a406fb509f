use actix_web::{error, http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use crate::models::{CoordinateError, ErrorResponse};
use crate::services::StoreError;

/// Errors surfaced to HTTP callers
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<CoordinateError> for DispatchError {
    fn from(err: CoordinateError) -> Self {
        DispatchError::Validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for DispatchError {
    fn from(err: validator::ValidationErrors) -> Self {
        DispatchError::Validation(err.to_string())
    }
}

impl ResponseError for DispatchError {
    fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::Validation(_) => StatusCode::BAD_REQUEST,
            DispatchError::NotFound(_) => StatusCode::NOT_FOUND,
            DispatchError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            DispatchError::Validation(msg) => ErrorResponse::new("validation_error", msg.clone()),
            DispatchError::NotFound(msg) => ErrorResponse::new("not_found", msg.clone()),
            DispatchError::Store(e) => {
                tracing::error!("Store failure: {}", e);
                ErrorResponse::new("internal_error", "An internal server error occurred")
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    DispatchError::Validation(format!("Invalid JSON: {}", err)).into()
}
