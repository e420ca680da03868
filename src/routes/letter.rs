use axum::{extract::State, routing::post, Json, Router};
use tracing::info;

use crate::agents::drafter::today;
use crate::models::{AppState, ChatMessage, DraftRequest, DraftResponse, LetterRequest, LetterResponse};
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/letter/draft", post(post_draft))
        .route("/api/v1/letter/generate", post(post_generate))
        .with_state(state)
}

/// One pass of the drafting workflow
pub async fn post_draft(
    State(state): State<AppState>,
    Json(request): Json<DraftRequest>,
) -> AppResult<Json<DraftResponse>> {
    let turn = state.drafts.process_turn(request.session_id, &request.message).await?;

    Ok(Json(DraftResponse {
        session_id: turn.session_id,
        messages: turn
            .replies
            .into_iter()
            .map(|content| ChatMessage {
                role: "assistant".to_string(),
                content,
            })
            .collect(),
        completion_ratio: turn.completion_ratio,
        finalize_requested: turn.finalize_requested,
        letter: turn.letter,
    }))
}

/// Letter straight from a transcript, without the drafting loop
pub async fn post_generate(
    State(state): State<AppState>,
    Json(request): Json<LetterRequest>,
) -> AppResult<Json<LetterResponse>> {
    info!(chat_len = request.chat_content.len(), "Received letter generation request");

    let content = state.drafter.draft_from_text(&request.chat_content, &today()).await?;
    Ok(Json(LetterResponse { content }))
}
