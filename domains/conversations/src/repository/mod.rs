//! Persistence Gateway for the Conversations domain
//!
//! `ConversationStore` is the only shared mutable resource in the system.
//! Every mutation is a single-row insert or a single-row flag update, so no
//! operation needs a multi-row transaction.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{Conversation, FlagUpdate, Message, NewMessage};
use parley_common::Result;

pub use memory::InMemoryConversationStore;
pub use postgres::PgConversationStore;

/// Durable store for conversations and their append-only message logs
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Persist a freshly created conversation
    async fn insert_conversation(&self, conversation: &Conversation) -> Result<()>;

    /// Append a message; fails with `NotFound` when the conversation is absent
    async fn insert_message(&self, message: &NewMessage) -> Result<Message>;

    /// Conversation with messages ordered by `created_at`, then `sequence`
    async fn find_with_messages(&self, id: Uuid) -> Result<Option<Conversation>>;

    /// All conversations, newest first, each with its ordered messages
    async fn list_with_messages(&self) -> Result<Vec<Conversation>>;

    /// Apply a `FlagUpdate` atomically; returns `false` when no row matched
    async fn update_flags(&self, id: Uuid, update: FlagUpdate) -> Result<bool>;
}
