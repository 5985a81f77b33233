//! Axum HTTP surface.

pub mod chat;
pub mod conversations;
pub mod history;
pub mod search;

use axum::routing::{delete, get, post};
use axum::{Json, Router};

use crate::state::AppState;

/// Assemble the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/search", post(search::search))
        .route("/api/chat", post(chat::chat))
        .route("/api/history/{conversation_id}", get(history::get_history))
        .route("/api/conversations", get(conversations::list_conversations))
        .route(
            "/api/conversations/{id}",
            delete(conversations::delete_conversation),
        )
        .with_state(state)
}

/// GET / — liveness probe.
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Lumina Search Backend is running" }))
}
