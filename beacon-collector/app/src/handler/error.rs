use crate::domain::ValidationError;
use crate::port::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::error;

/// Errors a handler turns into an HTTP response.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{error}")]
    BadRequest { error: String, details: Value },

    #[error("{0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>, details: Value) -> Self {
        ApiError::BadRequest {
            error: error.into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// `details` shape shared by single and batch validation failures.
pub fn validation_details(err: &ValidationError) -> Value {
    json!({
        "rule": err.rule(),
        "field": err.field(),
        "message": err.to_string(),
    })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(err) => json!({
                "error": "Validation error",
                "details": validation_details(&err),
            }),
            ApiError::BadRequest { error, details } => json!({
                "error": error,
                "details": details,
            }),
            ApiError::NotFound(message) => json!({ "error": message }),
            ApiError::Storage(err) => {
                error!(error = %err, "Storage operation failed");
                json!({
                    "error": "Internal server error",
                    "message": err.to_string(),
                })
            }
        };
        (status, Json(body)).into_response()
    }
}
