use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::models::{SearchRequest, SourceModel};
use crate::retrieval;
use crate::state::AppState;

/// POST /api/search — search-only mode: run the retrieval pipeline
/// (search + rerank) and return the sources, with no model call and no
/// persistence.
pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<Vec<SourceModel>>, (StatusCode, String)> {
    let query = req.query.trim().to_string();
    if query.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Query is required".to_string()));
    }

    let retrieved = retrieval::retrieve(&state.http_client, &state.config, &query).await;
    if retrieved.degraded {
        tracing::warn!("Search degraded for query, returning no results");
    }

    Ok(Json(retrieved.docs.iter().map(SourceModel::from).collect()))
}
