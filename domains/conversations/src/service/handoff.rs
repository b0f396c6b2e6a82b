//! Admin Handoff Handler
//!
//! Operator-side commands: flip manual mode and answer by hand. Credential
//! checks happen before these are reached.

use serde::Serialize;
use uuid::Uuid;

use parley_common::{is_blank, Error, Result};

use crate::domain::entities::{Conversation, Message, NewMessage};
use crate::domain::state::{HandoffEvent, HandoffStateMachine};
use crate::service::lifecycle::ConversationService;

/// Operator reply together with the conversation after the wait was cleared
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManualReply {
    pub conversation: Conversation,
    pub reply: Message,
}

#[derive(Clone)]
pub struct AdminHandoffHandler {
    conversations: ConversationService,
}

impl AdminHandoffHandler {
    pub fn new(conversations: ConversationService) -> Self {
        Self { conversations }
    }

    #[mutants::skip] // Delegates to ConversationService::list_conversations
    pub async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        self.conversations.list_conversations().await
    }

    /// Set manual mode explicitly
    pub async fn set_manual_mode(
        &self,
        conversation_id: Uuid,
        enabled: bool,
    ) -> Result<Conversation> {
        let conversation = self
            .conversations
            .set_manual_mode(conversation_id, enabled)
            .await?;

        tracing::info!(
            conversation_id = %conversation_id,
            state = %conversation.handoff_state(),
            "Manual mode set"
        );
        Ok(conversation)
    }

    /// Flip manual mode relative to its current value
    pub async fn toggle_manual(&self, conversation_id: Uuid) -> Result<Conversation> {
        let current = self.conversations.get_conversation(conversation_id).await?;
        let before = current.handoff_state();

        let conversation = self
            .conversations
            .set_manual_mode(conversation_id, !current.manual_mode)
            .await?;

        tracing::info!(
            conversation_id = %conversation_id,
            from = %before,
            to = %HandoffStateMachine::transition(before, HandoffEvent::ToggleManual),
            "Manual mode toggled"
        );
        Ok(conversation)
    }

    /// Append an operator reply and clear any pending wait.
    ///
    /// Manual mode does not have to be on: an operator may answer a message
    /// that was left waiting before manual mode was switched off.
    pub async fn send_manual_reply(
        &self,
        conversation_id: Uuid,
        text: &str,
    ) -> Result<ManualReply> {
        if is_blank(text) {
            return Err(Error::Validation("Reply text cannot be empty".to_string()));
        }

        let message = NewMessage::admin(conversation_id, text);
        let reply_id = message.id();
        let appended = self.conversations.append_message(message).await?;
        let before = appended.handoff_state();

        let conversation = self.conversations.mark_waiting(conversation_id, false).await?;

        let reply = conversation
            .find_message(reply_id)
            .cloned()
            .ok_or_else(|| Error::Internal("stored reply missing from conversation".to_string()))?;

        tracing::info!(
            conversation_id = %conversation_id,
            from = %before,
            to = %HandoffStateMachine::transition(before, HandoffEvent::ManualReply),
            "Operator reply stored"
        );

        Ok(ManualReply {
            conversation,
            reply,
        })
    }
}
