//! Request handlers

pub mod admin;
pub mod chat;
pub mod session;

use serde::Serialize;

use crate::domain::entities::Conversation;

/// `{"conversation": ...}` response body
#[derive(Debug, Serialize)]
pub struct ConversationEnvelope {
    pub conversation: Conversation,
}

impl From<Conversation> for ConversationEnvelope {
    fn from(conversation: Conversation) -> Self {
        Self { conversation }
    }
}
