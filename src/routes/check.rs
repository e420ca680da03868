use axum::{extract::State, routing::post, Json, Router};

use crate::agents::CompletionAnalysis;
use crate::models::{AppState, CompletionCheckRequest};
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/check", post(check_completion))
        .with_state(state)
}

pub async fn check_completion(
    State(state): State<AppState>,
    Json(request): Json<CompletionCheckRequest>,
) -> AppResult<Json<CompletionAnalysis>> {
    let analysis = state.scorer.assess(&request.chat_history).await?;
    Ok(Json(analysis))
}
