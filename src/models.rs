use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role tag carried by every persisted message and every prompt entry.
///
/// Stored as lowercase text in the database and serialized the same way
/// on the wire, so one enum covers both concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A retrieved web document flowing through search → rerank → prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchDoc {
    pub title: String,
    pub url: String,
    pub content: String,
    /// Cross-encoder relevance score, attached by the reranker
    pub score: Option<f32>,
}

/// One entry of the prompt sent to the model backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// Search request
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// A cited document, as returned to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceModel {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl From<&SearchDoc> for SourceModel {
    fn from(doc: &SearchDoc) -> Self {
        Self {
            title: doc.title.clone(),
            url: doc.url.clone(),
            snippet: doc.content.clone(),
        }
    }
}

/// Chat request
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: Option<String>,
}

/// Chat response
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub conversation_id: String,
    pub sources: Vec<SourceModel>,
}

/// One message of a conversation, as returned by the history endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub id: i64,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Pagination query parameters for the conversation listing.
#[derive(Debug, Clone, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_page_limit")]
    pub limit: i64,
}

fn default_page_limit() -> i64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_to_lowercase() {
        let json = serde_json::to_value(Role::Assistant).unwrap();
        assert_eq!(json, "assistant");
    }

    #[test]
    fn test_role_round_trips() {
        let json = serde_json::to_string(&Role::User).unwrap();
        let back: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Role::User);
    }

    #[test]
    fn test_source_model_from_doc_maps_content_to_snippet() {
        let doc = SearchDoc {
            title: "Rust book".into(),
            url: "https://example.com".into(),
            content: "ownership and borrowing".into(),
            score: Some(0.9),
        };
        let src = SourceModel::from(&doc);
        assert_eq!(src.snippet, "ownership and borrowing");
        assert_eq!(src.title, "Rust book");
    }

    #[test]
    fn test_page_params_defaults() {
        let p: PageParams = serde_json::from_str("{}").unwrap();
        assert_eq!(p.offset, 0);
        assert_eq!(p.limit, 10);
    }
}
