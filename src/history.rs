//! History Adapter: a per-session view over the Conversation Store, shaped
//! the way the chat pipeline consumes prior turns.

use anyhow::Result;

use crate::models::{ChatTurn, Role};
use crate::store::ConversationStore;

/// Title prefix length taken from the first message of a lazily created
/// conversation.
const TITLE_PREFIX_CHARS: usize = 30;

pub struct SessionHistory {
    store: ConversationStore,
    session_id: String,
}

impl SessionHistory {
    pub fn new(store: ConversationStore, session_id: impl Into<String>) -> Self {
        Self {
            store,
            session_id: session_id.into(),
        }
    }

    /// Prior turns for this session, in chronological order. Returns an
    /// empty list if the conversation does not yet exist. Only user and
    /// assistant messages are replayed; other roles are dropped.
    pub async fn load_messages(&self) -> Result<Vec<ChatTurn>> {
        if self
            .store
            .get_conversation(&self.session_id)
            .await?
            .is_none()
        {
            return Ok(Vec::new());
        }

        let messages = self.store.get_history(&self.session_id).await?;
        Ok(messages
            .into_iter()
            .filter(|m| matches!(m.role, Role::User | Role::Assistant))
            .map(|m| ChatTurn {
                role: m.role,
                content: m.content,
            })
            .collect())
    }

    /// Persist one turn entry, creating the conversation on first use with
    /// a title derived from the message content.
    pub async fn append(&self, role: Role, content: &str) -> Result<()> {
        if self
            .store
            .get_conversation(&self.session_id)
            .await?
            .is_none()
        {
            let title: String = content.chars().take(TITLE_PREFIX_CHARS).collect();
            self.store
                .create_conversation(Some(self.session_id.clone()), Some(title))
                .await?;
        }

        self.store
            .add_message(&self.session_id, role, content, &[])
            .await?;
        Ok(())
    }

    /// Declared no-op: history is append-only through this adapter.
    pub fn clear(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    async fn memory_store() -> ConversationStore {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        ConversationStore::new(pool)
    }

    #[tokio::test]
    async fn test_load_unknown_session_is_empty() {
        let history = SessionHistory::new(memory_store().await, "never-seen");
        assert!(history.load_messages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_creates_conversation_with_title_prefix() {
        let store = memory_store().await;
        let history = SessionHistory::new(store.clone(), "s1");

        let long = "What is the capital of France and why is it Paris?";
        history.append(Role::User, long).await.unwrap();

        let conv = store.get_conversation("s1").await.unwrap().unwrap();
        let title = conv.title.unwrap();
        assert_eq!(title.chars().count(), 30);
        assert!(long.starts_with(&title));
    }

    #[tokio::test]
    async fn test_append_reuses_existing_conversation() {
        let store = memory_store().await;
        let history = SessionHistory::new(store.clone(), "s1");

        history.append(Role::User, "first").await.unwrap();
        history.append(Role::Assistant, "reply").await.unwrap();

        // Title still reflects the first message
        let conv = store.get_conversation("s1").await.unwrap().unwrap();
        assert_eq!(conv.title.as_deref(), Some("first"));

        let turns = history.load_messages().await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_load_drops_system_messages() {
        let store = memory_store().await;
        store
            .create_conversation(Some("s1".into()), None)
            .await
            .unwrap();
        store
            .add_message("s1", Role::System, "instructions", &[])
            .await
            .unwrap();
        store
            .add_message("s1", Role::User, "question", &[])
            .await
            .unwrap();

        let history = SessionHistory::new(store, "s1");
        let turns = history.load_messages().await.unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].content, "question");
    }

    #[tokio::test]
    async fn test_clear_is_a_noop() {
        let store = memory_store().await;
        let history = SessionHistory::new(store, "s1");
        history.append(Role::User, "kept").await.unwrap();
        history.clear();
        assert_eq!(history.load_messages().await.unwrap().len(), 1);
    }
}
