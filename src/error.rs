//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::assessment::AssessmentError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Bad input: unknown category, out of range, unparseable body
    #[error("{0}")]
    ValidationError(String),

    // Model load/inference failures
    #[error("{0}")]
    ModelError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::ModelError(msg) => {
                tracing::error!("Model error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let body = Json(json!({
            "error": format!("Error processing request: {}", error_message),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<AssessmentError> for AppError {
    fn from(err: AssessmentError) -> Self {
        match err {
            AssessmentError::InvalidCategory { .. } | AssessmentError::Validation(_) => {
                AppError::ValidationError(err.to_string())
            }
            AssessmentError::Model(_) => AppError::ModelError(err.to_string()),
        }
    }
}
