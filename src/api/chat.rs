use std::fmt::Write;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::history::SessionHistory;
use crate::llm::{self, sanitize_for_prompt};
use crate::models::{ChatRequest, ChatResponse, ChatTurn, Role, SearchDoc, SourceModel};
use crate::retrieval;
use crate::state::AppState;
use crate::store::ConversationStore;

const MAX_CHAT_MESSAGE_LEN: usize = 2000;

/// POST /api/chat — one full retrieval-augmented chat turn:
///   1. Resolve the session id (client-supplied or freshly generated)
///   2. Retrieve context (search + rerank)
///   3. Build the prompt: system instruction with context, prior history,
///      the new user input
///   4. Invoke the model
///   5. Persist the user and assistant messages, then attach sources to
///      the assistant message (best effort)
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    let message = req.message.trim().to_string();
    if message.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Message is required".to_string()));
    }
    let message = sanitize_for_prompt(&truncate_to_char_boundary(&message, MAX_CHAT_MESSAGE_LEN));

    // ── Step 1: Resolve session id ────────────────────────
    let conversation_id = match req.conversation_id.filter(|id| !id.trim().is_empty()) {
        Some(id) => id,
        None => format!("sess_{}", Uuid::new_v4()),
    };

    // ── Step 2: Retrieve context ──────────────────────────
    let retrieved = retrieval::retrieve(&state.http_client, &state.config, &message).await;
    if retrieved.degraded {
        tracing::warn!(%conversation_id, "Retrieval degraded, answering without citations");
    }
    let context_block = build_context_block(&retrieved.docs);

    // ── Step 3: Load history and build prompt ─────────────
    let store = ConversationStore::new(state.pool.clone());
    let session = SessionHistory::new(store.clone(), conversation_id.clone());

    let prior = session
        .load_messages()
        .await
        .map_err(|e| internal(format!("Failed to load history: {e}")))?;

    let messages = build_messages(build_system_prompt(&context_block), &prior, &message);

    // ── Step 4: Invoke model ──────────────────────────────
    let response_text = llm::complete(&state.http_client, &state.config.llm, messages)
        .await
        .map_err(|e| internal(format!("LLM error: {e}")))?;

    // ── Step 5: Persist the turn ──────────────────────────
    session
        .append(Role::User, &message)
        .await
        .map_err(|e| internal(format!("Failed to persist user message: {e}")))?;
    session
        .append(Role::Assistant, &response_text)
        .await
        .map_err(|e| internal(format!("Failed to persist assistant message: {e}")))?;

    // Losing source attribution must never fail the response.
    if !retrieved.docs.is_empty() {
        if let Err(e) = attach_sources(&store, &conversation_id, &retrieved.docs).await {
            tracing::warn!(%conversation_id, "Failed to save sources: {e}");
        }
    }

    Ok(Json(ChatResponse {
        response: response_text,
        conversation_id,
        sources: retrieved.docs.iter().map(SourceModel::from).collect(),
    }))
}

/// Attach retrieved sources to the newest assistant message of the turn.
async fn attach_sources(
    store: &ConversationStore,
    conversation_id: &str,
    docs: &[SearchDoc],
) -> anyhow::Result<()> {
    let last = store
        .latest_assistant_message(conversation_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("no assistant message to attach sources to"))?;
    store.attach_sources(last.id, docs).await
}

// ─── Helper functions ────────────────────────────────────

fn internal(msg: String) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, msg)
}

fn build_system_prompt(context_block: &str) -> String {
    format!(
        "You are a helpful AI research assistant. Use the following context to answer \
         the user's question.\n\
         If the answer is not in the context, say so, but try to be helpful based on \
         your general knowledge.\n\
         Always cite your sources if you use them.\n\n\
         Context:\n{context_block}"
    )
}

/// Concatenate retrieved documents into the context block, in rerank order.
fn build_context_block(docs: &[SearchDoc]) -> String {
    let mut ctx = String::new();
    for (i, doc) in docs.iter().enumerate() {
        if i > 0 {
            ctx.push_str("\n\n");
        }
        write!(
            ctx,
            "Source: {}\nURL: {}\nContent: {}",
            doc.title,
            doc.url,
            sanitize_for_prompt(&doc.content)
        )
        .unwrap();
    }
    ctx
}

fn build_messages(system_prompt: String, history: &[ChatTurn], message: &str) -> Vec<ChatTurn> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatTurn {
        role: Role::System,
        content: system_prompt,
    });
    messages.extend(history.iter().cloned());
    messages.push(ChatTurn {
        role: Role::User,
        content: message.to_string(),
    });
    messages
}

fn truncate_to_char_boundary(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    s.char_indices()
        .take_while(|(i, _)| *i < max_len)
        .map(|(_, c)| c)
        .collect()
}
