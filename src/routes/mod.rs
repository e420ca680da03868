//! API Routes
//!
//! Thin JSON endpoints over the session services:
//! - `/api/v1/chat` - Supervisor dispatch cycle
//! - `/api/v1/chat/{session_id}/history` - Durable chat history
//! - `/api/v1/letter/draft` - Drafting workflow pass
//! - `/api/v1/letter/generate` - One-shot letter from a transcript
//! - `/api/v1/check` - Completion check
//! - `/api/health` - Health checks

pub mod chat;
pub mod check;
pub mod health;
pub mod letter;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let origins = state.config.server.cors_allowed_origins.clone();

    let router = Router::new()
        .merge(chat::router(state.clone()))
        .merge(letter::router(state.clone()))
        .merge(check::router(state.clone()))
        .merge(health::router(state))
        .layer(TraceLayer::new_for_http());

    apply_cors(router, &origins)
}
