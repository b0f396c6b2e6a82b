//! Postgres conversation store

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Conversation, FlagUpdate, Message, NewMessage};
use crate::repository::ConversationStore;
use parley_common::{Error, Result};

/// Conversation row without its messages
#[derive(Debug, sqlx::FromRow)]
struct ConversationRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    manual_mode: bool,
    waiting_for_manual: bool,
}

impl ConversationRow {
    fn with_messages(self, messages: Vec<Message>) -> Conversation {
        Conversation {
            id: self.id,
            name: self.name,
            created_at: self.created_at,
            manual_mode: self.manual_mode,
            waiting_for_manual: self.waiting_for_manual,
            messages,
        }
    }
}

#[derive(Clone)]
pub struct PgConversationStore {
    pool: PgPool,
}

impl PgConversationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn messages_for(&self, conversation_ids: &[Uuid]) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, conversation_id, sender, text, via, sequence, created_at
            FROM messages
            WHERE conversation_id = ANY($1)
            ORDER BY created_at ASC, sequence ASC
            "#,
        )
        .bind(conversation_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_foreign_key_violation(),
        _ => false,
    }
}

#[async_trait]
impl ConversationStore for PgConversationStore {
    async fn insert_conversation(&self, conversation: &Conversation) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO conversations (id, name, created_at, manual_mode, waiting_for_manual)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(conversation.id)
        .bind(&conversation.name)
        .bind(conversation.created_at)
        .bind(conversation.manual_mode)
        .bind(conversation.waiting_for_manual)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_message(&self, message: &NewMessage) -> Result<Message> {
        let created = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, conversation_id, sender, text, via, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, conversation_id, sender, text, via, sequence, created_at
            "#,
        )
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(message.sender)
        .bind(&message.text)
        .bind(message.via)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                Error::conversation_not_found()
            } else {
                Error::Database(e)
            }
        })?;

        Ok(created)
    }

    async fn find_with_messages(&self, id: Uuid) -> Result<Option<Conversation>> {
        let row = sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT id, name, created_at, manual_mode, waiting_for_manual
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let messages = self.messages_for(&[id]).await?;
        Ok(Some(row.with_messages(messages)))
    }

    async fn list_with_messages(&self) -> Result<Vec<Conversation>> {
        let rows = sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT id, name, created_at, manual_mode, waiting_for_manual
            FROM conversations
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut grouped: HashMap<Uuid, Vec<Message>> = HashMap::new();
        for message in self.messages_for(&ids).await? {
            grouped
                .entry(message.conversation_id)
                .or_default()
                .push(message);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let messages = grouped.remove(&row.id).unwrap_or_default();
                row.with_messages(messages)
            })
            .collect())
    }

    async fn update_flags(&self, id: Uuid, update: FlagUpdate) -> Result<bool> {
        // Same rule as FlagUpdate::apply, in one statement
        let result = sqlx::query(
            r#"
            UPDATE conversations SET
                manual_mode = COALESCE($2, manual_mode),
                waiting_for_manual = CASE
                    WHEN COALESCE($2, manual_mode) THEN COALESCE($3, waiting_for_manual)
                    ELSE FALSE
                END
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(update.manual_mode)
        .bind(update.waiting_for_manual)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
