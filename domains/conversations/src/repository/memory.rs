//! Process-local conversation store
//!
//! Backs `STORE_BACKEND=memory` and the test suites. A single lock guards
//! every mutation, and it is never held across an await point.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{Conversation, FlagUpdate, Message, NewMessage};
use crate::repository::ConversationStore;
use parley_common::{Error, Result};

#[derive(Debug, Default)]
struct Inner {
    conversations: HashMap<Uuid, Conversation>,
    next_sequence: i64,
}

#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    inner: RwLock<Inner>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| Error::Persistence("conversation store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| Error::Persistence("conversation store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn insert_conversation(&self, conversation: &Conversation) -> Result<()> {
        let mut inner = self.write()?;
        inner.conversations.insert(
            conversation.id,
            Conversation {
                messages: Vec::new(),
                ..conversation.clone()
            },
        );
        Ok(())
    }

    async fn insert_message(&self, message: &NewMessage) -> Result<Message> {
        let mut inner = self.write()?;
        inner.next_sequence += 1;
        let sequence = inner.next_sequence;

        let conversation = inner
            .conversations
            .get_mut(&message.conversation_id)
            .ok_or_else(Error::conversation_not_found)?;

        let stored = message.clone().into_message(sequence);
        let position = conversation.messages.partition_point(|m| {
            (m.created_at, m.sequence) <= (stored.created_at, stored.sequence)
        });
        conversation.messages.insert(position, stored.clone());

        Ok(stored)
    }

    async fn find_with_messages(&self, id: Uuid) -> Result<Option<Conversation>> {
        Ok(self.read()?.conversations.get(&id).cloned())
    }

    async fn list_with_messages(&self) -> Result<Vec<Conversation>> {
        let mut conversations: Vec<Conversation> =
            self.read()?.conversations.values().cloned().collect();
        conversations.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(conversations)
    }

    async fn update_flags(&self, id: Uuid, update: FlagUpdate) -> Result<bool> {
        let mut inner = self.write()?;
        let Some(conversation) = inner.conversations.get_mut(&id) else {
            return Ok(false);
        };

        let (manual_mode, waiting_for_manual) =
            update.apply(conversation.manual_mode, conversation.waiting_for_manual);
        conversation.manual_mode = manual_mode;
        conversation.waiting_for_manual = waiting_for_manual;
        Ok(true)
    }
}
