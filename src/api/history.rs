use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::models::MessageView;
use crate::state::AppState;
use crate::store::ConversationStore;

/// GET /api/history/{conversation_id} — ordered message list for a
/// conversation, or 404 if the conversation is unknown.
pub async fn get_history(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<Vec<MessageView>>, (StatusCode, String)> {
    let store = ConversationStore::new(state.pool.clone());

    let conversation = store
        .get_conversation(&conversation_id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    if conversation.is_none() {
        return Err((StatusCode::NOT_FOUND, "Conversation not found".to_string()));
    }

    let messages = store
        .get_history(&conversation_id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(
        messages
            .into_iter()
            .map(|m| MessageView {
                id: m.id,
                role: m.role,
                content: m.content,
                created_at: m.created_at,
            })
            .collect(),
    ))
}
