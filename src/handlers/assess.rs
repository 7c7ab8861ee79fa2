//! JSON assessment handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{AppState, AppResult, AppError};
use crate::assessment::{self, Assessment, AssessmentRequest};

/// Assess a JSON-encoded request
pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<AssessmentRequest>, JsonRejection>,
) -> AppResult<Json<Assessment>> {
    let Json(req) = payload.map_err(|e| AppError::ValidationError(e.body_text()))?;
    let assessment = assessment::assess(&state.model, &req)?;
    Ok(Json(assessment))
}
