//! Conversation Store: relational persistence for conversations, messages,
//! and the sources cited by assistant replies.
//!
//! All operations commit immediately; the only multi-statement unit is
//! `add_message`, which inserts the message and any supplied sources in one
//! transaction.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Role, SearchDoc};

/// A conversation row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: String,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A message row. Ordered within a conversation by `created_at`, with `id`
/// breaking ties since timestamps share resolution.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Message {
    pub id: i64,
    pub conversation_id: String,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A source row, attached to an assistant message.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Source {
    pub id: i64,
    pub message_id: i64,
    pub url: String,
    pub title: String,
    pub snippet: String,
}

#[derive(Clone)]
pub struct ConversationStore {
    pool: SqlitePool,
}

impl ConversationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a conversation, generating a session id if none is supplied.
    pub async fn create_conversation(
        &self,
        id: Option<String>,
        title: Option<String>,
    ) -> Result<Conversation> {
        let id = id.unwrap_or_else(|| format!("sess_{}", Uuid::new_v4()));
        let created_at = Utc::now();

        sqlx::query("INSERT INTO conversations (id, title, created_at) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(&title)
            .bind(created_at)
            .execute(&self.pool)
            .await?;

        Ok(Conversation {
            id,
            title,
            created_at,
        })
    }

    pub async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>> {
        let row = sqlx::query_as::<_, Conversation>(
            "SELECT id, title, created_at FROM conversations WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list_conversations(&self, offset: i64, limit: i64) -> Result<Vec<Conversation>> {
        let rows = sqlx::query_as::<_, Conversation>(
            "SELECT id, title, created_at FROM conversations \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Insert a message and any supplied sources in one transaction.
    pub async fn add_message(
        &self,
        conversation_id: &str,
        role: Role,
        content: &str,
        sources: &[SearchDoc],
    ) -> Result<Message> {
        let created_at = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO messages (conversation_id, role, content, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(conversation_id)
        .bind(role)
        .bind(content)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;
        let message_id = result.last_insert_rowid();

        for doc in sources {
            sqlx::query("INSERT INTO sources (message_id, url, title, snippet) VALUES (?, ?, ?, ?)")
                .bind(message_id)
                .bind(&doc.url)
                .bind(&doc.title)
                .bind(&doc.content)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(Message {
            id: message_id,
            conversation_id: conversation_id.to_string(),
            role,
            content: content.to_string(),
            created_at,
        })
    }

    /// Attach sources to an already-persisted message.
    pub async fn attach_sources(&self, message_id: i64, sources: &[SearchDoc]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for doc in sources {
            sqlx::query("INSERT INTO sources (message_id, url, title, snippet) VALUES (?, ?, ?, ?)")
                .bind(message_id)
                .bind(&doc.url)
                .bind(&doc.title)
                .bind(&doc.content)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// All messages of a conversation in chronological order. Empty if the
    /// conversation does not exist.
    pub async fn get_history(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let rows = sqlx::query_as::<_, Message>(
            "SELECT id, conversation_id, role, content, created_at FROM messages \
             WHERE conversation_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// The newest assistant message of a conversation, if any.
    pub async fn latest_assistant_message(&self, conversation_id: &str) -> Result<Option<Message>> {
        let row = sqlx::query_as::<_, Message>(
            "SELECT id, conversation_id, role, content, created_at FROM messages \
             WHERE conversation_id = ? AND role = ? \
             ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(conversation_id)
        .bind(Role::Assistant)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn sources_for_message(&self, message_id: i64) -> Result<Vec<Source>> {
        let rows = sqlx::query_as::<_, Source>(
            "SELECT id, message_id, url, title, snippet FROM sources \
             WHERE message_id = ? ORDER BY id ASC",
        )
        .bind(message_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Delete a conversation; messages and sources go with it via cascade.
    /// Returns false if the conversation did not exist.
    pub async fn delete_conversation(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
