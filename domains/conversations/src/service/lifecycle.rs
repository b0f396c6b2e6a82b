//! Conversation Lifecycle Service
//!
//! Creates conversations, appends messages, reads history and mutates the
//! manual-mode flags. Every flag change goes through a single
//! `FlagUpdate`, never two separate writes.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{Conversation, FlagUpdate, NewMessage};
use crate::repository::ConversationStore;
use parley_common::{Error, Result};

#[derive(Clone)]
pub struct ConversationService {
    store: Arc<dyn ConversationStore>,
}

impl ConversationService {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    /// Create and persist a new conversation
    pub async fn create_conversation(&self, name: &str) -> Result<Conversation> {
        let conversation = Conversation::new(name)?;
        self.store.insert_conversation(&conversation).await?;

        tracing::info!(conversation_id = %conversation.id, "Conversation created");
        Ok(conversation)
    }

    /// Read a conversation with its full ordered history
    pub async fn get_conversation(&self, id: Uuid) -> Result<Conversation> {
        self.store
            .find_with_messages(id)
            .await?
            .ok_or_else(Error::conversation_not_found)
    }

    /// Append a message; returns the conversation including it
    pub async fn append_message(&self, message: NewMessage) -> Result<Conversation> {
        let stored = self.store.insert_message(&message).await?;

        tracing::debug!(
            conversation_id = %stored.conversation_id,
            message_id = %stored.id,
            sender = %stored.sender,
            text_len = stored.text.chars().count(),
            "Message appended"
        );

        self.get_conversation(stored.conversation_id).await
    }

    /// Set manual mode; disabling it clears the waiting flag in the same update
    pub async fn set_manual_mode(&self, id: Uuid, enabled: bool) -> Result<Conversation> {
        self.update_flags(id, FlagUpdate::manual_mode(enabled)).await
    }

    /// Set the waiting flag. Only the inbound handler's manual branch may set it true.
    pub async fn mark_waiting(&self, id: Uuid, waiting: bool) -> Result<Conversation> {
        self.update_flags(id, FlagUpdate::waiting(waiting)).await
    }

    /// All conversations, newest first, for the admin view
    pub async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        self.store.list_with_messages().await
    }

    async fn update_flags(&self, id: Uuid, update: FlagUpdate) -> Result<Conversation> {
        if !self.store.update_flags(id, update).await? {
            return Err(Error::conversation_not_found());
        }
        self.get_conversation(id).await
    }
}
