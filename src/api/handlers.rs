use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::{RecommendationRequest, RecommendationResponse},
    services::recommendations,
};

use super::AppState;

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Handler for the recommendation endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let response = recommendations::recommend(
        Arc::clone(&state.generative),
        Arc::clone(&state.catalog),
        &state.regions,
        request,
    )
    .await?;

    Ok(Json(response))
}
