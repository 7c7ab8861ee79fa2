//! Model status handler

use axum::{extract::State, Json};

use crate::AppState;
use crate::model::ModelStatus;

/// Loaded model, feature layout and inference counters
pub async fn status(State(state): State<AppState>) -> Json<ModelStatus> {
    Json(state.model.status())
}
