use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::info;
use uuid::Uuid;

use crate::models::{AppState, ChatMessage, ChatRequest, ChatResponse};
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/chat", post(post_chat))
        .route("/api/v1/chat/{session_id}/history", get(get_history).delete(clear_history))
        .with_state(state)
}

pub async fn post_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    info!(session_id = ?request.session_id, message_count = request.messages.len(), "Received chat request");

    let turns = request.messages.into_iter().map(ChatMessage::into_turn).collect();
    let reply = state.chat.process_chat(request.session_id, turns).await?;

    let messages = reply
        .reply
        .map(|content| ChatMessage {
            role: "assistant".to_string(),
            content,
        })
        .into_iter()
        .collect();

    Ok(Json(ChatResponse {
        messages,
        session_id: reply.session_id,
    }))
}

async fn get_history(State(state): State<AppState>, Path(session_id): Path<Uuid>) -> Json<ChatResponse> {
    let history = state.chat.history(&session_id).await;
    Json(ChatResponse {
        messages: history.iter().filter_map(ChatMessage::from_turn).collect(),
        session_id,
    })
}

async fn clear_history(State(state): State<AppState>, Path(session_id): Path<Uuid>) -> Json<serde_json::Value> {
    let cleared = state.chat.clear_history(&session_id).await;
    Json(serde_json::json!({ "session_id": session_id, "cleared": cleared }))
}
