use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::models::PageParams;
use crate::state::AppState;
use crate::store::{Conversation, ConversationStore};

/// GET /api/conversations — a page of conversations, newest first.
pub async fn list_conversations(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<Conversation>>, (StatusCode, String)> {
    let store = ConversationStore::new(state.pool.clone());
    let conversations = store
        .list_conversations(page.offset.max(0), page.limit.clamp(1, 100))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(conversations))
}

/// DELETE /api/conversations/{id} — remove a conversation and, via
/// cascade, its messages and their sources.
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let store = ConversationStore::new(state.pool.clone());
    let deleted = store
        .delete_conversation(&id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    if !deleted {
        return Err((StatusCode::NOT_FOUND, "Conversation not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
